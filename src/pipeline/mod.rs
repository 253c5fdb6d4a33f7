//! Request orchestration: the text and music romanization pipelines and
//! the response envelopes they produce.

mod error;
mod music;
mod response;
mod text;

pub use error::PipelineError;
pub use music::{MusicRequest, MusicRomanizationPipeline};
pub use response::{ResponseAssembler, RomanizedLine, API_VERSION};
pub use text::{RomanizationPipeline, TextRequest};

use crate::engine::{EngineError, RawOptions, RomanizationOptions, TransliterationEngine};
use crate::script::{default_system, RomanizationSystem, ScriptCode, ScriptDetector};

/// Explicit script code wins; otherwise detect from the text.
fn resolve_script(
    detector: &ScriptDetector,
    explicit: Option<&str>,
    text: &str,
) -> Result<ScriptCode, PipelineError> {
    match explicit {
        Some(code) => code
            .parse()
            .map_err(|_| PipelineError::InvalidInput(format!("Invalid script code '{}'", code))),
        None => detector
            .detect(text)
            .map_err(|_| PipelineError::InvalidInput("Invalid text input".to_string())),
    }
}

/// Explicit system wins; otherwise the script's deterministic default.
fn resolve_system(
    explicit: Option<&str>,
    script: ScriptCode,
) -> Result<RomanizationSystem, PipelineError> {
    match explicit {
        Some(raw) => raw.parse().map_err(|_| PipelineError::UnsupportedSystem {
            system: raw.to_string(),
            script,
        }),
        None => Ok(default_system(script)),
    }
}

fn resolve_options(raw: Option<&RawOptions>) -> Result<RomanizationOptions, PipelineError> {
    match raw {
        Some(raw) => RomanizationOptions::from_raw(raw)
            .map_err(|err| PipelineError::InvalidOption(err.to_string())),
        None => Ok(RomanizationOptions::default()),
    }
}

/// Engine lookup plus the capability checks the registry performs
/// before dispatch.
fn resolve_engine<'a>(
    engines: &'a crate::engine::EngineRegistry,
    script: ScriptCode,
    system: RomanizationSystem,
) -> Result<&'a dyn TransliterationEngine, PipelineError> {
    let engine = engines
        .get(script)
        .ok_or_else(|| PipelineError::UnsupportedScript {
            script: script.to_string(),
        })?;
    if !engine.supports_system(system) {
        return Err(PipelineError::UnsupportedSystem {
            system: system.to_string(),
            script,
        });
    }
    Ok(engine)
}

/// Options are validated before dispatch, so an engine failure here is
/// a bug worth surfacing loudly.
fn engine_failure(err: EngineError, script: ScriptCode) -> PipelineError {
    match err {
        EngineError::UnsupportedSystem(system) => PipelineError::UnsupportedSystem {
            system: system.to_string(),
            script,
        },
        EngineError::Failed(msg) => PipelineError::Internal(msg),
    }
}
