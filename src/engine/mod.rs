//! Transliteration engines and their shared contract.
//!
//! One engine per script, registered in an [`EngineRegistry`]. Every
//! engine applies its steps in the same fixed order: variant
//! normalization, script conversion to base Latin units, system-specific
//! post-rules, separator join, case transform. Casing must run last or
//! digraphs and separators would get mangled mid-pipeline.

mod cantonese;
mod japanese;
mod korean;
mod mandarin;
mod options;
mod render;
mod russian;

pub use cantonese::CantoneseEngine;
pub use japanese::JapaneseEngine;
pub use korean::KoreanEngine;
pub use mandarin::MandarinEngine;
pub use options::{CaseStyle, LongVowelStyle, RawOptions, RomanizationOptions, ToneStyle};
pub use russian::RussianEngine;

use crate::script::{default_system, RomanizationSystem, ScriptCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Romanization system '{0}' is not supported by this engine")]
    UnsupportedSystem(RomanizationSystem),

    #[error("Romanization failed: {0}")]
    Failed(String),
}

/// One contiguous range of the original text and the romanized form it
/// maps to. Offsets are in characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignmentSpan {
    pub range: [usize; 2],
    pub script: ScriptCode,
    pub romanized: String,
}

/// Output of a single engine invocation.
///
/// `confidence` is an engine-declared constant reflecting engine
/// maturity, not a measured score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RomanizationResult {
    pub romanized: String,
    pub system: RomanizationSystem,
    pub confidence: f64,
    pub spans: Vec<AlignmentSpan>,
}

impl RomanizationResult {
    /// Single span covering the full input, the coarsest alignment that
    /// still satisfies the coverage invariant.
    fn whole_text(
        original: &str,
        romanized: String,
        system: RomanizationSystem,
        confidence: f64,
        script: ScriptCode,
    ) -> Self {
        let spans = vec![AlignmentSpan {
            range: [0, original.chars().count()],
            script,
            romanized: romanized.clone(),
        }];
        Self {
            romanized,
            system,
            confidence,
            spans,
        }
    }
}

/// Contract every per-script engine implements.
///
/// Engines are pure: same text, system, and options always produce the
/// same result. Unsupported systems are a normal error branch, checked
/// by callers via [`supports_system`](Self::supports_system) before
/// dispatch where possible.
pub trait TransliterationEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn script(&self) -> ScriptCode;

    fn default_system(&self) -> RomanizationSystem {
        default_system(self.script())
    }

    fn supports_system(&self, system: RomanizationSystem) -> bool;

    fn romanize(
        &self,
        text: &str,
        system: RomanizationSystem,
        options: &RomanizationOptions,
    ) -> Result<RomanizationResult, EngineError>;
}

/// Maps a script code to its engine. Scripts without an engine (English)
/// are simply absent; lookup failure is handled by the pipeline.
pub struct EngineRegistry {
    engines: HashMap<ScriptCode, Box<dyn TransliterationEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
        }
    }

    /// Registry with all built-in engines.
    pub fn with_default_engines() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MandarinEngine::new()));
        registry.register(Box::new(CantoneseEngine::new()));
        registry.register(Box::new(JapaneseEngine::new()));
        registry.register(Box::new(KoreanEngine::new()));
        registry.register(Box::new(RussianEngine::new()));
        registry
    }

    /// Register an engine under its own script code, replacing any
    /// previous registration.
    pub fn register(&mut self, engine: Box<dyn TransliterationEngine>) {
        self.engines.insert(engine.script(), engine);
    }

    pub fn get(&self, script: ScriptCode) -> Option<&dyn TransliterationEngine> {
        self.engines.get(&script).map(|e| e.as_ref())
    }

    pub fn supported_scripts(&self) -> Vec<ScriptCode> {
        let mut scripts: Vec<ScriptCode> = self.engines.keys().copied().collect();
        scripts.sort_by_key(|s| s.as_str());
        scripts
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_default_engines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_all_non_latin_scripts() {
        let registry = EngineRegistry::with_default_engines();
        for script in [
            ScriptCode::Zh,
            ScriptCode::Yue,
            ScriptCode::Ja,
            ScriptCode::Ko,
            ScriptCode::Ru,
        ] {
            assert!(registry.get(script).is_some(), "missing engine for {}", script);
        }
        assert!(registry.get(ScriptCode::En).is_none());
    }

    #[test]
    fn engines_support_their_default_system() {
        let registry = EngineRegistry::with_default_engines();
        for script in registry.supported_scripts() {
            let engine = registry.get(script).unwrap();
            assert!(engine.supports_system(engine.default_system()));
        }
    }

    #[test]
    fn registration_overrides_previous_engine() {
        struct FixedEngine;
        impl TransliterationEngine for FixedEngine {
            fn name(&self) -> &'static str {
                "FixedEngine"
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
                _options: &RomanizationOptions,
            ) -> Result<RomanizationResult, EngineError> {
                Ok(RomanizationResult::whole_text(
                    text,
                    "fixed".to_string(),
                    system,
                    1.0,
                    ScriptCode::Zh,
                ))
            }
        }

        let mut registry = EngineRegistry::with_default_engines();
        registry.register(Box::new(FixedEngine));
        assert_eq!(registry.get(ScriptCode::Zh).unwrap().name(), "FixedEngine");
    }
}
