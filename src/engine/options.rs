use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvalidOptionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaseStyle {
    #[default]
    Lower,
    Upper,
    Title,
}

impl FromStr for CaseStyle {
    type Err = InvalidOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lower" => Ok(CaseStyle::Lower),
            "upper" => Ok(CaseStyle::Upper),
            "title" => Ok(CaseStyle::Title),
            other => Err(InvalidOptionError(format!(
                "case must be 'lower', 'upper', or 'title', got '{}'",
                other
            ))),
        }
    }
}

/// How Mandarin tones are rendered: diacritics, trailing digits, or
/// stripped entirely. Ignored by other scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToneStyle {
    #[default]
    Marks,
    Numbers,
    None,
}

impl FromStr for ToneStyle {
    type Err = InvalidOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marks" => Ok(ToneStyle::Marks),
            "numbers" => Ok(ToneStyle::Numbers),
            "none" => Ok(ToneStyle::None),
            other => Err(InvalidOptionError(format!(
                "tone_style must be 'marks', 'numbers', or 'none', got '{}'",
                other
            ))),
        }
    }
}

/// Japanese long-vowel rendering. Ignored by other scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LongVowelStyle {
    #[default]
    Macron,
    Circumflex,
    Double,
}

impl FromStr for LongVowelStyle {
    type Err = InvalidOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "macron" => Ok(LongVowelStyle::Macron),
            "circumflex" => Ok(LongVowelStyle::Circumflex),
            "double" => Ok(LongVowelStyle::Double),
            other => Err(InvalidOptionError(format!(
                "long_vowels must be 'macron', 'circumflex', or 'double', got '{}'",
                other
            ))),
        }
    }
}

/// Options exactly as they arrive in a request body. Values are loose
/// strings so that invalid ones can be rejected with a proper error
/// message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOptions {
    pub case: Option<String>,
    pub separator: Option<String>,
    pub tone_style: Option<String>,
    pub long_vowels: Option<String>,
    pub normalize_variants: Option<bool>,
}

/// Validated rendering knobs, with the defaults the engines assume.
///
/// Field order is fixed and the struct serializes deterministically,
/// which the cache-key derivation relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RomanizationOptions {
    pub case: CaseStyle,
    pub separator: String,
    pub tone_style: ToneStyle,
    pub long_vowels: LongVowelStyle,
    pub normalize_variants: bool,
}

impl Default for RomanizationOptions {
    fn default() -> Self {
        Self {
            case: CaseStyle::Lower,
            separator: " ".to_string(),
            tone_style: ToneStyle::Marks,
            long_vowels: LongVowelStyle::Macron,
            normalize_variants: true,
        }
    }
}

impl RomanizationOptions {
    /// Validate raw request options. Every invalid value is reported
    /// before any engine runs.
    pub fn from_raw(raw: &RawOptions) -> Result<Self, InvalidOptionError> {
        let mut options = Self::default();
        if let Some(case) = &raw.case {
            options.case = case.parse()?;
        }
        if let Some(separator) = &raw.separator {
            options.separator = separator.clone();
        }
        if let Some(tone_style) = &raw.tone_style {
            options.tone_style = tone_style.parse()?;
        }
        if let Some(long_vowels) = &raw.long_vowels {
            options.long_vowels = long_vowels.parse()?;
        }
        if let Some(normalize_variants) = raw.normalize_variants {
            options.normalize_variants = normalize_variants;
        }
        Ok(options)
    }
}
