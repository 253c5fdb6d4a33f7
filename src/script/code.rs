use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of writing systems the service understands.
///
/// `Zh` and `Yue` share the Han character block and are only
/// distinguishable lexically, which is why the detector has a dedicated
/// Cantonese pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptCode {
    Zh,
    Yue,
    Ja,
    Ko,
    Ru,
    En,
}

impl ScriptCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptCode::Zh => "zh",
            ScriptCode::Yue => "yue",
            ScriptCode::Ja => "ja",
            ScriptCode::Ko => "ko",
            ScriptCode::Ru => "ru",
            ScriptCode::En => "en",
        }
    }
}

impl fmt::Display for ScriptCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh" => Ok(ScriptCode::Zh),
            "yue" => Ok(ScriptCode::Yue),
            "ja" => Ok(ScriptCode::Ja),
            "ko" => Ok(ScriptCode::Ko),
            "ru" => Ok(ScriptCode::Ru),
            "en" => Ok(ScriptCode::En),
            _ => Err(()),
        }
    }
}

pub fn supported_scripts() -> Vec<&'static str> {
    vec!["zh", "yue", "ja", "ko", "ru", "en"]
}

/// Named romanization conventions. Each script owns a subset of these,
/// see [`systems_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RomanizationSystem {
    #[serde(rename = "pinyin")]
    Pinyin,
    #[serde(rename = "jyutping")]
    Jyutping,
    #[serde(rename = "hepburn")]
    Hepburn,
    #[serde(rename = "revised")]
    Revised,
    #[serde(rename = "iso-9")]
    Iso9,
    #[serde(rename = "bgn-pcgn")]
    BgnPcgn,
    #[serde(rename = "none")]
    None,
}

impl RomanizationSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            RomanizationSystem::Pinyin => "pinyin",
            RomanizationSystem::Jyutping => "jyutping",
            RomanizationSystem::Hepburn => "hepburn",
            RomanizationSystem::Revised => "revised",
            RomanizationSystem::Iso9 => "iso-9",
            RomanizationSystem::BgnPcgn => "bgn-pcgn",
            RomanizationSystem::None => "none",
        }
    }
}

impl fmt::Display for RomanizationSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RomanizationSystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pinyin" => Ok(RomanizationSystem::Pinyin),
            "jyutping" => Ok(RomanizationSystem::Jyutping),
            "hepburn" => Ok(RomanizationSystem::Hepburn),
            "revised" => Ok(RomanizationSystem::Revised),
            "iso-9" => Ok(RomanizationSystem::Iso9),
            "bgn-pcgn" => Ok(RomanizationSystem::BgnPcgn),
            "none" => Ok(RomanizationSystem::None),
            _ => Err(()),
        }
    }
}

/// Systems a script can be romanized with, in preference order.
pub fn systems_for(script: ScriptCode) -> &'static [RomanizationSystem] {
    match script {
        ScriptCode::Zh => &[RomanizationSystem::Pinyin],
        ScriptCode::Yue => &[RomanizationSystem::Jyutping],
        ScriptCode::Ja => &[RomanizationSystem::Hepburn],
        ScriptCode::Ko => &[RomanizationSystem::Revised],
        ScriptCode::Ru => &[RomanizationSystem::Iso9, RomanizationSystem::BgnPcgn],
        ScriptCode::En => &[RomanizationSystem::None],
    }
}

/// The deterministic default: first entry of the script's system list.
pub fn default_system(script: ScriptCode) -> RomanizationSystem {
    systems_for(script)[0]
}
