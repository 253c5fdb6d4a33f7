//! Mandarin Chinese engine: Hanyu Pinyin.
//!
//! The character table is an illustrative stub covering common
//! characters; a production deployment would plug in a dictionary-backed
//! engine behind the same contract.

use super::render::join_and_case;
use super::{EngineError, RomanizationOptions, RomanizationResult, ToneStyle, TransliterationEngine};
use crate::script::{RomanizationSystem, ScriptCode};
use lazy_static::lazy_static;
use std::collections::HashMap;

const CONFIDENCE: f64 = 0.95;

lazy_static! {
    /// Pinyin readings keyed by character, tone stored as a trailing
    /// digit (5 = neutral). `v` stands for `ü`.
    static ref PINYIN: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        for (c, p) in [
            ('你', "ni3"), ('好', "hao3"), ('世', "shi4"), ('界', "jie4"),
            ('谢', "xie4"), ('再', "zai4"), ('见', "jian4"), ('中', "zhong1"),
            ('国', "guo2"), ('文', "wen2"), ('不', "bu4"), ('对', "dui4"),
            ('很', "hen3"), ('一', "yi1"), ('共', "gong4"), ('有', "you3"),
            ('我', "wo3"), ('是', "shi4"), ('爱', "ai4"), ('月', "yue4"),
            ('亮', "liang4"), ('代', "dai4"), ('表', "biao3"), ('的', "de5"),
            ('心', "xin1"), ('天', "tian1"), ('上', "shang4"), ('人', "ren2"),
            ('大', "da4"), ('小', "xiao3"), ('来', "lai2"), ('去', "qu4"),
            ('说', "shuo1"), ('话', "hua4"), ('歌', "ge1"), ('唱', "chang4"),
            ('想', "xiang3"), ('要', "yao4"), ('会', "hui4"), ('能', "neng2"),
            ('在', "zai4"), ('这', "zhe4"), ('那', "na4"), ('什', "shen2"),
            ('么', "me5"), ('没', "mei2"), ('和', "he2"), ('了', "le5"),
            ('吗', "ma5"), ('他', "ta1"), ('她', "ta1"), ('们', "men5"),
            ('年', "nian2"), ('日', "ri4"), ('风', "feng1"), ('花', "hua1"),
            ('雪', "xue3"), ('夜', "ye4"), ('星', "xing1"), ('光', "guang1"),
            ('梦', "meng4"), ('情', "qing2"), ('美', "mei3"), ('朋', "peng2"),
            ('友', "you3"), ('女', "nv3"), ('绿', "lv4"), ('简', "jian3"),
            ('体', "ti3"), ('繁', "fan2"), ('台', "tai2"), ('湾', "wan1"),
            ('香', "xiang1"), ('港', "gang3"), ('澳', "ao4"), ('门', "men2"),
        ] {
            m.insert(c, p);
        }
        m
    };

    /// Traditional → simplified character map for variant normalization.
    static ref TRADITIONAL_TO_SIMPLIFIED: HashMap<char, char> = {
        let mut m = HashMap::new();
        for (t, s) in [
            ('體', '体'), ('簡', '简'), ('灣', '湾'), ('國', '国'),
            ('門', '门'), ('愛', '爱'), ('說', '说'), ('話', '话'),
            ('夢', '梦'), ('風', '风'), ('見', '见'), ('謝', '谢'),
            ('們', '们'), ('來', '来'), ('對', '对'), ('會', '会'),
        ] {
            m.insert(t, s);
        }
        m
    };
}

const TONE_MARKS: &[(char, [char; 4])] = &[
    ('a', ['ā', 'á', 'ǎ', 'à']),
    ('e', ['ē', 'é', 'ě', 'è']),
    ('i', ['ī', 'í', 'ǐ', 'ì']),
    ('o', ['ō', 'ó', 'ǒ', 'ò']),
    ('u', ['ū', 'ú', 'ǔ', 'ù']),
    ('ü', ['ǖ', 'ǘ', 'ǚ', 'ǜ']),
];

fn is_han(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Render a tone-numbered syllable (`hao3`) in the requested style.
fn render_tone(syllable: &str, style: ToneStyle) -> String {
    let syllable = syllable.replace('v', "ü");
    let (base, tone) = match syllable
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
    {
        Some(d) => (&syllable[..syllable.len() - 1], d),
        None => (syllable.as_str(), 5),
    };

    match style {
        ToneStyle::Numbers => syllable.clone(),
        ToneStyle::None => base.to_string(),
        ToneStyle::Marks => {
            if !(1..=4).contains(&tone) {
                return base.to_string();
            }
            let target = marked_vowel(base);
            match target {
                Some(vowel) => {
                    let marks = TONE_MARKS
                        .iter()
                        .find(|(v, _)| *v == vowel)
                        .map(|(_, marks)| marks)
                        .unwrap();
                    let mut replaced = false;
                    base.chars()
                        .map(|c| {
                            if c == vowel && !replaced {
                                replaced = true;
                                marks[(tone - 1) as usize]
                            } else {
                                c
                            }
                        })
                        .collect()
                }
                None => base.to_string(),
            }
        }
    }
}

/// Standard placement: `a`/`e` take the mark if present, then the `o` of
/// `ou`, otherwise the last vowel.
fn marked_vowel(base: &str) -> Option<char> {
    if base.contains('a') {
        return Some('a');
    }
    if base.contains('e') {
        return Some('e');
    }
    if base.contains("ou") {
        return Some('o');
    }
    base.chars().rev().find(|c| "iouü".contains(*c))
}

pub struct MandarinEngine;

impl MandarinEngine {
    pub fn new() -> Self {
        Self
    }

    /// Split into per-character syllable units; runs of non-Han text pass
    /// through as single units.
    fn to_units(&self, text: &str, options: &RomanizationOptions) -> Vec<String> {
        let mut units = Vec::new();
        let mut passthrough = String::new();
        for c in text.chars() {
            let c = if options.normalize_variants {
                *TRADITIONAL_TO_SIMPLIFIED.get(&c).unwrap_or(&c)
            } else {
                c
            };
            if is_han(c) {
                if !passthrough.trim().is_empty() {
                    units.push(passthrough.trim().to_string());
                }
                passthrough.clear();
                match PINYIN.get(&c) {
                    Some(syllable) => units.push(render_tone(syllable, options.tone_style)),
                    None => units.push(c.to_string()),
                }
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

impl Default for MandarinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransliterationEngine for MandarinEngine {
    fn name(&self) -> &'static str {
        "MandarinEngine"
    }

    fn script(&self) -> ScriptCode {
        ScriptCode::Zh
    }

    fn supports_system(&self, system: RomanizationSystem) -> bool {
        system == RomanizationSystem::Pinyin
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
            ScriptCode::Zh,
        ))
    }
}
