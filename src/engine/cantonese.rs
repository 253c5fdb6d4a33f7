//! Cantonese engine: Jyutping, tone numbers always.
//!
//! Illustrative character table, same caveat as the Mandarin engine.

use super::render::join_and_case;
use super::{EngineError, RomanizationOptions, RomanizationResult, TransliterationEngine};
use crate::script::{RomanizationSystem, ScriptCode};
use lazy_static::lazy_static;
use std::collections::HashMap;

const CONFIDENCE: f64 = 0.90;

lazy_static! {
    static ref JYUTPING: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        for (c, j) in [
            ('嘅', "ge3"), ('咗', "zo2"), ('咁', "gam3"), ('啲', "di1"),
            ('嘢', "je5"), ('唔', "m4"), ('係', "hai6"), ('佢', "keoi5"),
            ('哋', "dei6"), ('行', "haang4"), ('更', "gaang1"),
            ('你', "nei5"), ('好', "hou2"), ('我', "ngo5"), ('有', "jau5"),
            ('冇', "mou5"), ('去', "heoi3"), ('嚟', "lai4"), ('食', "sik6"),
            ('飲', "jam2"), ('睇', "tai2"), ('聽', "teng1"), ('講', "gong2"),
            ('話', "waa6"), ('知', "zi1"), ('道', "dou6"), ('做', "zou6"),
            ('買', "maai5"), ('賣', "maai6"), ('錢', "cin4"), ('屋', "uk1"),
            ('企', "kei5"), ('坐', "co5"), ('走', "zau2"), ('跑', "paau2"),
            ('跳', "tiu3"), ('游', "jau4"), ('大', "daai6"), ('細', "sai3"),
            ('高', "gou1"), ('矮', "ai2"), ('長', "coeng4"), ('短', "dyun2"),
            ('肥', "fei4"), ('瘦', "sau3"), ('新', "san1"), ('舊', "gau6"),
            ('靚', "leng3"), ('醜', "cau2"), ('快', "faai3"), ('慢', "maan6"),
            ('早', "zou2"), ('遲', "ci4"), ('熱', "jit6"), ('凍', "dung3"),
            ('暖', "nyun5"), ('涼', "loeng4"), ('人', "jan4"), ('香', "hoeng1"),
            ('港', "gong2"),
        ] {
            m.insert(c, j);
        }
        m
    };
}

fn is_han(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

pub struct CantoneseEngine;

impl CantoneseEngine {
    pub fn new() -> Self {
        Self
    }

    fn to_units(&self, text: &str) -> Vec<String> {
        let mut units = Vec::new();
        let mut passthrough = String::new();
        for c in text.chars() {
            if is_han(c) {
                if !passthrough.trim().is_empty() {
                    units.push(passthrough.trim().to_string());
                }
                passthrough.clear();
                // Unknown Han characters surface as '?' so the gap in the
                // table is visible rather than silently dropped.
                units.push(JYUTPING.get(&c).unwrap_or(&"?").to_string());
            } else {
                passthrough.push(c);
            }
        }
        if !passthrough.trim().is_empty() {
            units.push(passthrough.trim().to_string());
        }
        units
    }
}

impl Default for CantoneseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransliterationEngine for CantoneseEngine {
    fn name(&self) -> &'static str {
        "CantoneseEngine"
    }

    fn script(&self) -> ScriptCode {
        ScriptCode::Yue
    }

    fn supports_system(&self, system: RomanizationSystem) -> bool {
        system == RomanizationSystem::Jyutping
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
            ScriptCode::Yue,
        ))
    }
}
