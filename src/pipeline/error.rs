use crate::script::ScriptCode;
use crate::source::ResolveError;
use thiserror::Error;

/// The user-visible error taxonomy. Every variant maps to one HTTP
/// status; per-source and cache failures never reach this type raw.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Script '{script}' is not supported")]
    UnsupportedScript { script: String },

    #[error("Romanization system '{system}' is not supported for script '{script}'")]
    UnsupportedSystem { system: String, script: ScriptCode },

    #[error("{0}")]
    InvalidOption(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Server error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::InvalidInput(_)
            | PipelineError::UnsupportedScript { .. }
            | PipelineError::UnsupportedSystem { .. }
            | PipelineError::InvalidOption(_) => 400,
            PipelineError::Resolve(resolve) => match resolve {
                ResolveError::PlatformUnavailable { .. }
                | ResolveError::NoSourceForScript { .. } => 400,
                ResolveError::SongNotFound { .. } | ResolveError::LyricsNotFound { .. } => 404,
            },
            PipelineError::Internal(_) => 500,
        }
    }

    /// Source names that were tried before giving up, for the error
    /// envelope.
    pub fn attempted_sources(&self) -> Option<&[String]> {
        match self {
            PipelineError::Resolve(ResolveError::SongNotFound { attempted }) => {
                Some(attempted.as_slice())
            }
            _ => None,
        }
    }

    pub fn names_supported_scripts(&self) -> bool {
        matches!(self, PipelineError::UnsupportedScript { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(PipelineError::InvalidInput("x".into()).status(), 400);
        assert_eq!(
            PipelineError::UnsupportedScript { script: "th".into() }.status(),
            400
        );
        assert_eq!(PipelineError::InvalidOption("x".into()).status(), 400);
        assert_eq!(
            PipelineError::Resolve(ResolveError::SongNotFound { attempted: vec![] }).status(),
            404
        );
        assert_eq!(
            PipelineError::Resolve(ResolveError::NoSourceForScript {
                script: ScriptCode::Ru
            })
            .status(),
            400
        );
        assert_eq!(PipelineError::Internal("boom".into()).status(), 500);
    }

    #[test]
    fn song_not_found_carries_the_attempt_list() {
        let err = PipelineError::Resolve(ResolveError::SongNotFound {
            attempted: vec!["netease".into(), "lrclib".into()],
        });
        assert_eq!(err.attempted_sources().unwrap().len(), 2);
        assert!(err.to_string().contains("netease"));
        assert!(err.to_string().contains("lrclib"));
    }
}
