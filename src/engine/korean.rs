//! Korean engine: Revised Romanization via algorithmic Hangul
//! decomposition.
//!
//! Precomposed syllables (U+AC00..U+D7A3) decompose arithmetically into
//! initial/medial/final jamo, so no per-word table is needed.

use super::render::join_and_case;
use super::{EngineError, RomanizationOptions, RomanizationResult, TransliterationEngine};
use crate::script::{RomanizationSystem, ScriptCode};

const CONFIDENCE: f64 = 0.90;

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_END: u32 = 0xD7A3;
const MEDIAL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;

/// Revised Romanization of the 19 initial consonants.
const INITIALS: [&str; 19] = [
    "g", "kk", "n", "d", "tt", "r", "m", "b", "pp", "s", "ss", "", "j", "jj", "ch", "k", "t", "p",
    "h",
];

/// The 21 medial vowels.
const MEDIALS: [&str; 21] = [
    "a", "ae", "ya", "yae", "eo", "e", "yeo", "ye", "o", "wa", "wae", "oe", "yo", "u", "wo", "we",
    "wi", "yu", "eu", "ui", "i",
];

/// The 27 final consonants (index 0 = no final). Clusters reduce to
/// their pronounced coda.
const FINALS: [&str; 28] = [
    "", "k", "k", "k", "n", "n", "n", "t", "l", "k", "m", "l", "l", "l", "l", "l", "m", "p", "p",
    "t", "t", "ng", "t", "t", "k", "t", "p", "t",
];

fn decompose(c: char) -> Option<(usize, usize, usize)> {
    let code = c as u32;
    if !(SYLLABLE_BASE..=SYLLABLE_END).contains(&code) {
        return None;
    }
    let index = code - SYLLABLE_BASE;
    let initial = index / (MEDIAL_COUNT * FINAL_COUNT);
    let medial = (index % (MEDIAL_COUNT * FINAL_COUNT)) / FINAL_COUNT;
    let fin = index % FINAL_COUNT;
    Some((initial as usize, medial as usize, fin as usize))
}

pub struct KoreanEngine;

impl KoreanEngine {
    pub fn new() -> Self {
        Self
    }

    fn to_units(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|token| {
                token
                    .chars()
                    .map(|c| match decompose(c) {
                        Some((i, m, f)) => {
                            format!("{}{}{}", INITIALS[i], MEDIALS[m], FINALS[f])
                        }
                        None => c.to_string(),
                    })
                    .collect::<String>()
            })
            .collect()
    }
}

impl Default for KoreanEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransliterationEngine for KoreanEngine {
    fn name(&self) -> &'static str {
        "KoreanEngine"
    }

    fn script(&self) -> ScriptCode {
        ScriptCode::Ko
    }

    fn supports_system(&self, system: RomanizationSystem) -> bool {
        system == RomanizationSystem::Revised
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
        let units = self.to_units(text);
        let romanized = join_and_case(&units, &options.separator, options.case);
        Ok(RomanizationResult::whole_text(
            text,
            romanized,
            system,
            CONFIDENCE,
            ScriptCode::Ko,
        ))
    }
}
