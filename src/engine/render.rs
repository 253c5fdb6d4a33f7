//! Shared rendering steps: separator join and case transform.
//!
//! These are the last two steps of every engine, in that order.

use super::options::CaseStyle;

pub fn join_and_case(units: &[String], separator: &str, case: CaseStyle) -> String {
    apply_case(&units.join(separator), case)
}

/// `Lower` is the identity: engines emit lowercase Latin and passthrough
/// text keeps its original casing.
pub fn apply_case(text: &str, case: CaseStyle) -> String {
    match case {
        CaseStyle::Lower => text.to_string(),
        CaseStyle::Upper => text.to_uppercase(),
        CaseStyle::Title => title_case(text),
    }
}

/// Uppercase the first alphanumeric character of every word, where a
/// word starts after any non-alphanumeric character.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_boundary {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_boundary = false;
        } else {
            out.push(c);
            at_boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("ni hao"), "Ni Hao");
        assert_eq!(title_case("ge3-zo2"), "Ge3-Zo2");
        assert_eq!(title_case("nǐ hǎo"), "Nǐ Hǎo");
    }

    #[test]
    fn lower_keeps_text_untouched() {
        assert_eq!(apply_case("MiXeD", CaseStyle::Lower), "MiXeD");
    }

    #[test]
    fn upper_uppercases_diacritics_too() {
        assert_eq!(apply_case("nǐ hǎo", CaseStyle::Upper), "NǏ HǍO");
    }

    #[test]
    fn join_respects_custom_separator() {
        let units = vec!["ni3".to_string(), "hao3".to_string()];
        assert_eq!(join_and_case(&units, "-", CaseStyle::Lower), "ni3-hao3");
    }
}
