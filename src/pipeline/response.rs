use crate::engine::RomanizationResult;
use crate::pipeline::PipelineError;
use crate::script::{supported_scripts, RomanizationSystem, ScriptCode};
use crate::source::Song;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Wire-format version stamped into every envelope.
pub const API_VERSION: &str = "2.0.0";

/// One romanized lyrics line. `timestamp` is seconds from song start,
/// absent for plain lyrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RomanizedLine {
    pub original: String,
    pub romanized: String,
    pub timestamp: Option<f64>,
}

/// Builds the response envelopes. Responses are assembled as JSON
/// values rather than typed structs so cache hits can be returned
/// byte-for-byte as they were stored.
pub struct ResponseAssembler;

impl ResponseAssembler {
    pub fn text_response(
        original: &str,
        script: ScriptCode,
        result: &RomanizationResult,
        engine_name: &str,
        processing_time_ms: u64,
    ) -> Value {
        json!({
            "original": original,
            "romanized": result.romanized,
            "language": script,
            "romanization_system": result.system,
            "confidence": result.confidence,
            "spans": result.spans,
            "metadata": {
                "timestamp": Utc::now().to_rfc3339(),
                "version": API_VERSION,
                "detected_script": script,
                "processing_time": processing_time_ms,
                "processor": engine_name,
            },
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn music_response(
        song: &Song,
        title_romanized: &str,
        artist_romanized: &str,
        script: ScriptCode,
        system: RomanizationSystem,
        lines: Vec<RomanizedLine>,
    ) -> Value {
        let synced = lines.iter().any(|line| line.timestamp.is_some());
        json!({
            "song": {
                "title": {
                    "original": song.title,
                    "romanized": title_romanized,
                },
                "artist": {
                    "original": song.artist,
                    "romanized": artist_romanized,
                },
                "id": song.id,
                "language": script,
                "romanization_system": system,
            },
            "lines": lines,
            "quality": {
                "synced": synced,
            },
            "metadata": {
                "timestamp": Utc::now().to_rfc3339(),
                "version": API_VERSION,
                "source": song.source,
            },
        })
    }

    pub fn error_body(err: &PipelineError) -> Value {
        let mut body = json!({
            "error": {
                "message": err.to_string(),
                "code": err.status(),
                "timestamp": Utc::now().to_rfc3339(),
                "version": API_VERSION,
            },
        });
        if err.names_supported_scripts() {
            body["supported_scripts"] = json!(supported_scripts());
        }
        if let Some(attempted) = err.attempted_sources() {
            body["attempted_sources"] = json!(attempted);
        }
        body
    }
}
