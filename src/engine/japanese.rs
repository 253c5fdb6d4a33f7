//! Japanese engine: Hepburn romaji.
//!
//! Kana are mapped to wāpuro-style base forms first, then Hepburn
//! post-rules (shi/chi/tsu/fu/ji/zu) and the long-vowel style are
//! applied per unit. Kanji are outside the stub table and pass through.

use super::render::join_and_case;
use super::{
    EngineError, LongVowelStyle, RomanizationOptions, RomanizationResult, TransliterationEngine,
};
use crate::script::{RomanizationSystem, ScriptCode};
use lazy_static::lazy_static;
use std::collections::HashMap;

const CONFIDENCE: f64 = 0.90;

lazy_static! {
    /// Kana → base romaji (Nihon-shiki style, normalized by the Hepburn
    /// post-rules).
    static ref KANA: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        let rows: &[(&str, &[&str])] = &[
            ("あいうえお", &["a", "i", "u", "e", "o"]),
            ("かきくけこ", &["ka", "ki", "ku", "ke", "ko"]),
            ("がぎぐげご", &["ga", "gi", "gu", "ge", "go"]),
            ("さしすせそ", &["sa", "si", "su", "se", "so"]),
            ("ざじずぜぞ", &["za", "zi", "zu", "ze", "zo"]),
            ("たちつてと", &["ta", "ti", "tu", "te", "to"]),
            ("だぢづでど", &["da", "di", "du", "de", "do"]),
            ("なにぬねの", &["na", "ni", "nu", "ne", "no"]),
            ("はひふへほ", &["ha", "hi", "hu", "he", "ho"]),
            ("ばびぶべぼ", &["ba", "bi", "bu", "be", "bo"]),
            ("ぱぴぷぺぽ", &["pa", "pi", "pu", "pe", "po"]),
            ("まみむめも", &["ma", "mi", "mu", "me", "mo"]),
            ("やゆよ", &["ya", "yu", "yo"]),
            ("らりるれろ", &["ra", "ri", "ru", "re", "ro"]),
            ("わを", &["wa", "wo"]),
            ("ん", &["n"]),
            ("アイウエオ", &["a", "i", "u", "e", "o"]),
            ("カキクケコ", &["ka", "ki", "ku", "ke", "ko"]),
            ("ガギグゲゴ", &["ga", "gi", "gu", "ge", "go"]),
            ("サシスセソ", &["sa", "si", "su", "se", "so"]),
            ("ザジズゼゾ", &["za", "zi", "zu", "ze", "zo"]),
            ("タチツテト", &["ta", "ti", "tu", "te", "to"]),
            ("ダヂヅデド", &["da", "di", "du", "de", "do"]),
            ("ナニヌネノ", &["na", "ni", "nu", "ne", "no"]),
            ("ハヒフヘホ", &["ha", "hi", "hu", "he", "ho"]),
            ("バビブベボ", &["ba", "bi", "bu", "be", "bo"]),
            ("パピプペポ", &["pa", "pi", "pu", "pe", "po"]),
            ("マミムメモ", &["ma", "mi", "mu", "me", "mo"]),
            ("ヤユヨ", &["ya", "yu", "yo"]),
            ("ラリルレロ", &["ra", "ri", "ru", "re", "ro"]),
            ("ワヲ", &["wa", "wo"]),
            ("ン", &["n"]),
        ];
        for (kana, romaji) in rows {
            for (c, r) in kana.chars().zip(romaji.iter()) {
                m.insert(c, *r);
            }
        }
        m
    };
}

const HEPBURN_RULES: &[(&str, &str)] = &[
    ("si", "shi"),
    ("ti", "chi"),
    ("tu", "tsu"),
    ("hu", "fu"),
    ("zi", "ji"),
    ("di", "ji"),
    ("du", "zu"),
];

fn apply_hepburn(unit: &str) -> String {
    let mut result = unit.to_string();
    for (from, to) in HEPBURN_RULES {
        result = result.replace(from, to);
    }
    result
}

fn apply_long_vowels(unit: &str, style: LongVowelStyle) -> String {
    let pairs: &[(&str, &str)] = match style {
        LongVowelStyle::Macron => &[("aa", "ā"), ("ii", "ī"), ("uu", "ū"), ("ee", "ē"), ("oo", "ō")],
        LongVowelStyle::Circumflex => {
            &[("aa", "â"), ("ii", "î"), ("uu", "û"), ("ee", "ê"), ("oo", "ô")]
        }
        LongVowelStyle::Double => return unit.to_string(),
    };
    let mut result = unit.to_string();
    for (from, to) in pairs {
        result = result.replace(from, to);
    }
    result
}

pub struct JapaneseEngine;

impl JapaneseEngine {
    pub fn new() -> Self {
        Self
    }

    /// Units are whitespace-separated tokens; kana inside a token are
    /// concatenated so a word romanizes as one unit.
    fn to_units(&self, text: &str, options: &RomanizationOptions) -> Vec<String> {
        text.split_whitespace()
            .map(|token| {
                let base: String = token
                    .chars()
                    .map(|c| KANA.get(&c).map(|r| r.to_string()).unwrap_or_else(|| c.to_string()))
                    .collect();
                apply_long_vowels(&apply_hepburn(&base), options.long_vowels)
            })
            .collect()
    }
}

impl Default for JapaneseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransliterationEngine for JapaneseEngine {
    fn name(&self) -> &'static str {
        "JapaneseEngine"
    }

    fn script(&self) -> ScriptCode {
        ScriptCode::Ja
    }

    fn supports_system(&self, system: RomanizationSystem) -> bool {
        system == RomanizationSystem::Hepburn
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
        let units = self.to_units(text, options);
        let romanized = join_and_case(&units, &options.separator, options.case);
        Ok(RomanizationResult::whole_text(
            text,
            romanized,
            system,
            CONFIDENCE,
            ScriptCode::Ja,
        ))
    }
}
