use super::ScriptCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Invalid text input for script detection")]
    InvalidInput,
}

/// Unicode blocks the detector counts characters against. Mandarin and
/// Cantonese share [`CharRange::Han`]; the split happens in a second,
/// lexical pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharRange {
    Han,
    Kana,
    Hangul,
    Cyrillic,
    Latin,
}

const RANGES: [CharRange; 5] = [
    CharRange::Han,
    CharRange::Kana,
    CharRange::Hangul,
    CharRange::Cyrillic,
    CharRange::Latin,
];

impl CharRange {
    fn matches(&self, c: char) -> bool {
        match self {
            CharRange::Han => ('\u{4e00}'..='\u{9fff}').contains(&c),
            CharRange::Kana => {
                ('\u{3040}'..='\u{309f}').contains(&c) || ('\u{30a0}'..='\u{30ff}').contains(&c)
            }
            CharRange::Hangul => ('\u{ac00}'..='\u{d7af}').contains(&c),
            CharRange::Cyrillic => ('\u{0400}'..='\u{04ff}').contains(&c),
            CharRange::Latin => c.is_ascii_alphabetic(),
        }
    }

    /// Minimum share of script-matched characters this range must reach
    /// to be accepted outright.
    fn confidence_threshold(&self) -> f64 {
        match self {
            CharRange::Han => 0.8,
            CharRange::Kana => 0.9,
            CharRange::Hangul => 0.9,
            CharRange::Cyrillic => 0.9,
            CharRange::Latin => 0.7,
        }
    }

    fn script(&self) -> ScriptCode {
        match self {
            CharRange::Han => ScriptCode::Zh,
            CharRange::Kana => ScriptCode::Ja,
            CharRange::Hangul => ScriptCode::Ko,
            CharRange::Cyrillic => ScriptCode::Ru,
            CharRange::Latin => ScriptCode::En,
        }
    }
}

/// Characters that essentially only occur in written Cantonese. Finding
/// any of them alongside Han text reclassifies Mandarin as Cantonese.
const CANTONESE_MARKERS: &[char] = &['嘅', '咗', '咁', '啲', '嘢', '唔', '係', '佢', '哋'];

/// Phrase lookup for inputs with no script-range characters at all
/// (e.g. pure punctuation plus a known greeting).
const KEYWORD_FALLBACKS: &[(ScriptCode, &[&str])] = &[
    (ScriptCode::Yue, &["唔係", "嘅", "咗", "咁", "啲", "嘢", "佢哋"]),
    (ScriptCode::Zh, &["你好", "谢谢", "再见", "中国", "中文", "不对", "很好"]),
    (ScriptCode::Ja, &["こんにちは", "ありがとう", "さようなら", "日本", "日本語"]),
    (ScriptCode::Ko, &["안녕하세요", "감사합니다", "안녕히", "한국", "한국어"]),
    (ScriptCode::Ru, &["привет", "спасибо", "до свидания", "русский", "Россия"]),
];

/// Best-effort script detection by Unicode-range frequency.
#[derive(Debug, Default, Clone)]
pub struct ScriptDetector;

impl ScriptDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the dominant script of `text`.
    ///
    /// Counts characters per Unicode range and accepts the range with the
    /// highest share of script-matched characters, provided it clears its
    /// confidence threshold; otherwise the highest share wins anyway.
    /// Inputs without any script characters fall through to a keyword
    /// table and finally default to `en`.
    pub fn detect(&self, text: &str) -> Result<ScriptCode, DetectError> {
        if text.trim().is_empty() {
            return Err(DetectError::InvalidInput);
        }

        let mut counts = [0usize; RANGES.len()];
        for c in text.chars() {
            for (i, range) in RANGES.iter().enumerate() {
                if range.matches(c) {
                    counts[i] += 1;
                }
            }
        }

        let total: usize = counts.iter().sum();
        if total == 0 {
            return Ok(Self::detect_by_keywords(text));
        }

        let mut best: Option<(CharRange, f64)> = None;
        let mut accepted: Option<(CharRange, f64)> = None;
        for (i, range) in RANGES.iter().enumerate() {
            if counts[i] == 0 {
                continue;
            }
            let share = counts[i] as f64 / total as f64;
            if best.map_or(true, |(_, s)| share > s) {
                best = Some((*range, share));
            }
            if share >= range.confidence_threshold()
                && accepted.map_or(true, |(_, s)| share > s)
            {
                accepted = Some((*range, share));
            }
        }

        // No range cleared its threshold: fall back to the best share.
        let (winner, _) = accepted.or(best).ok_or(DetectError::InvalidInput)?;

        let script = match winner {
            CharRange::Han => self.distinguish_chinese(text),
            other => other.script(),
        };
        Ok(script)
    }

    /// Secondary pass for Han text: Cantonese-specific particles and
    /// pronouns reclassify Mandarin as Cantonese.
    fn distinguish_chinese(&self, text: &str) -> ScriptCode {
        if text.chars().any(|c| CANTONESE_MARKERS.contains(&c)) {
            ScriptCode::Yue
        } else {
            ScriptCode::Zh
        }
    }

    fn detect_by_keywords(text: &str) -> ScriptCode {
        for (script, keywords) in KEYWORD_FALLBACKS {
            if keywords.iter().any(|kw| text.contains(kw)) {
                return *script;
            }
        }
        ScriptCode::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_script_strings_are_detected() {
        let detector = ScriptDetector::new();
        assert_eq!(detector.detect("你好世界").unwrap(), ScriptCode::Zh);
        assert_eq!(detector.detect("こんにちは").unwrap(), ScriptCode::Ja);
        assert_eq!(detector.detect("안녕하세요").unwrap(), ScriptCode::Ko);
        assert_eq!(detector.detect("Привет").unwrap(), ScriptCode::Ru);
        assert_eq!(detector.detect("hello").unwrap(), ScriptCode::En);
    }

    #[test]
    fn cantonese_markers_override_mandarin() {
        let detector = ScriptDetector::new();
        assert_eq!(detector.detect("我唔係香港人").unwrap(), ScriptCode::Yue);
        assert_eq!(detector.detect("你嘅名").unwrap(), ScriptCode::Yue);
        // Plain Han text stays Mandarin.
        assert_eq!(detector.detect("我是中国人").unwrap(), ScriptCode::Zh);
    }

    #[test]
    fn mixed_text_picks_the_dominant_range() {
        let detector = ScriptDetector::new();
        // Kana dominates the one Latin letter.
        assert_eq!(
            detector.detect("こんにちはこんにちは x").unwrap(),
            ScriptCode::Ja
        );
    }

    #[test]
    fn below_threshold_falls_back_to_best_share() {
        let detector = ScriptDetector::new();
        // Six Latin letters vs four Hangul syllables: Latin has the
        // highest share but misses the 0.7 threshold, and still wins.
        assert_eq!(detector.detect("abcdef 안녕하세").unwrap(), ScriptCode::En);
    }

    #[test]
    fn empty_input_is_rejected() {
        let detector = ScriptDetector::new();
        assert!(detector.detect("").is_err());
        assert!(detector.detect("   ").is_err());
    }

    #[test]
    fn punctuation_only_input_defaults_to_english() {
        let detector = ScriptDetector::new();
        assert_eq!(detector.detect("123 !?").unwrap(), ScriptCode::En);
    }
}
