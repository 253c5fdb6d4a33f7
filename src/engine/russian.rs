//! Russian engine: ISO 9 and BGN/PCGN transliteration.
//!
//! The only built-in engine with two systems; the system choice selects
//! the letter table, everything else is shared.

use super::render::join_and_case;
use super::{EngineError, RomanizationOptions, RomanizationResult, TransliterationEngine};
use crate::script::{RomanizationSystem, ScriptCode};

const ISO9_CONFIDENCE: f64 = 0.90;
const BGN_PCGN_CONFIDENCE: f64 = 0.85;

const ISO9: &[(char, &str)] = &[
    ('а', "a"), ('б', "b"), ('в', "v"), ('г', "g"), ('д', "d"), ('е', "e"),
    ('ё', "ë"), ('ж', "ž"), ('з', "z"), ('и', "i"), ('й', "j"), ('к', "k"),
    ('л', "l"), ('м', "m"), ('н', "n"), ('о', "o"), ('п', "p"), ('р', "r"),
    ('с', "s"), ('т', "t"), ('у', "u"), ('ф', "f"), ('х', "h"), ('ц', "c"),
    ('ч', "č"), ('ш', "š"), ('щ', "ŝ"), ('ъ', "ʺ"), ('ы', "y"), ('ь', "ʹ"),
    ('э', "è"), ('ю', "û"), ('я', "â"),
];

const BGN_PCGN: &[(char, &str)] = &[
    ('а', "a"), ('б', "b"), ('в', "v"), ('г', "g"), ('д', "d"), ('е', "e"),
    ('ё', "yo"), ('ж', "zh"), ('з', "z"), ('и', "i"), ('й', "y"), ('к', "k"),
    ('л', "l"), ('м', "m"), ('н', "n"), ('о', "o"), ('п', "p"), ('р', "r"),
    ('с', "s"), ('т', "t"), ('у', "u"), ('ф', "f"), ('х', "kh"), ('ц', "ts"),
    ('ч', "ch"), ('ш', "sh"), ('щ', "shch"), ('ъ', ""), ('ы', "y"), ('ь', "'"),
    ('э', "e"), ('ю', "yu"), ('я', "ya"),
];

fn lookup(table: &'static [(char, &'static str)], c: char) -> Option<&'static str> {
    table
        .iter()
        .find(|(cyr, _)| *cyr == c)
        .map(|(_, lat)| *lat)
}

/// Transliterate one character, preserving the case of uppercase
/// Cyrillic input on the first Latin letter.
fn transliterate_char(table: &'static [(char, &'static str)], c: char) -> String {
    let lower: char = c.to_lowercase().next().unwrap_or(c);
    match lookup(table, lower) {
        Some(lat) => {
            if c.is_uppercase() {
                let mut chars = lat.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            } else {
                lat.to_string()
            }
        }
        None => c.to_string(),
    }
}

pub struct RussianEngine;

impl RussianEngine {
    pub fn new() -> Self {
        Self
    }

    fn table(system: RomanizationSystem) -> &'static [(char, &'static str)] {
        match system {
            RomanizationSystem::BgnPcgn => BGN_PCGN,
            _ => ISO9,
        }
    }

    fn to_units(&self, text: &str, system: RomanizationSystem) -> Vec<String> {
        let table = Self::table(system);
        text.split_whitespace()
            .map(|token| {
                token
                    .chars()
                    .map(|c| transliterate_char(table, c))
                    .collect::<String>()
            })
            .collect()
    }
}

impl Default for RussianEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransliterationEngine for RussianEngine {
    fn name(&self) -> &'static str {
        "RussianEngine"
    }

    fn script(&self) -> ScriptCode {
        ScriptCode::Ru
    }

    fn supports_system(&self, system: RomanizationSystem) -> bool {
        matches!(
            system,
            RomanizationSystem::Iso9 | RomanizationSystem::BgnPcgn
        )
    }

    fn romanize(
        &self,
        text: &str,
        system: RomanizationSystem,
        options: &RomanizationOptions,
    ) -> Result<RomanizationResult, EngineError> {
        if !self.supports_system(system) {
            return Err(EngineError::UnsupportedSystem(system));
        }
        let units = self.to_units(text, system);
        let romanized = join_and_case(&units, &options.separator, options.case);
        let confidence = match system {
            RomanizationSystem::BgnPcgn => BGN_PCGN_CONFIDENCE,
            _ => ISO9_CONFIDENCE,
        };
        Ok(RomanizationResult::whole_text(
            text,
            romanized,
            system,
            confidence,
            ScriptCode::Ru,
        ))
    }
}
