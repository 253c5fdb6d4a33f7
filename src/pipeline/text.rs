use crate::cache::{cache_key, CacheStore, TEXT_NAMESPACE};
use crate::engine::{EngineRegistry, RawOptions};
use crate::pipeline::{
    engine_failure, resolve_engine, resolve_options, resolve_script, resolve_system,
    PipelineError, ResponseAssembler,
};
use crate::script::ScriptDetector;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Body of a plain-text romanization request. Everything but `text` is
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
    pub language: Option<String>,
    pub romanization_system: Option<String>,
    pub options: Option<RawOptions>,
}

/// Orchestrates a single-text request: detect, validate, consult the
/// cache, dispatch to an engine, assemble the envelope.
pub struct RomanizationPipeline {
    detector: ScriptDetector,
    engines: Arc<EngineRegistry>,
    cache: Arc<dyn CacheStore>,
    cache_ttl_secs: Option<u64>,
}

impl RomanizationPipeline {
    pub fn new(
        engines: Arc<EngineRegistry>,
        cache: Arc<dyn CacheStore>,
        cache_ttl_secs: Option<u64>,
    ) -> Self {
        Self {
            detector: ScriptDetector::new(),
            engines,
            cache,
            cache_ttl_secs,
        }
    }

    pub async fn handle(&self, request: &TextRequest) -> Result<Value, PipelineError> {
        let started = Instant::now();
        let text = match request.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => return Err(PipelineError::InvalidInput("Text is required".to_string())),
        };

        let script = resolve_script(&self.detector, request.language.as_deref(), text)?;
        let options = resolve_options(request.options.as_ref())?;
        let system = resolve_system(request.romanization_system.as_deref(), script)?;
        // Capability checks happen before any cache or network I/O.
        let engine = resolve_engine(&self.engines, script, system)?;

        let key = cache_key(TEXT_NAMESPACE, text, script, system, &options);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(script = %script, "Text romanization cache hit");
            return Ok(cached);
        }

        let result = engine
            .romanize(text, system, &options)
            .map_err(|err| engine_failure(err, script))?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let response =
            ResponseAssembler::text_response(text, script, &result, engine.name(), elapsed_ms);
        self.cache.set(&key, &response, self.cache_ttl_secs).await;
        Ok(response)
    }
}
