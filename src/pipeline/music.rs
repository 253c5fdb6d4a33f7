use crate::cache::{cache_key, CacheStore, MUSIC_NAMESPACE};
use crate::engine::{EngineRegistry, RawOptions, RomanizationOptions, TransliterationEngine};
use crate::pipeline::{
    engine_failure, resolve_engine, resolve_options, resolve_script, resolve_system,
    PipelineError, ResponseAssembler, RomanizedLine,
};
use crate::script::{RomanizationSystem, ScriptCode, ScriptDetector};
use crate::source::{FallbackResolver, LyricsDocument};
use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Body of a song romanization request. `artist` and `title` are
/// required; `music_platform` pins the search to one catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MusicRequest {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub romanization_system: Option<String>,
    pub music_platform: Option<String>,
    pub options: Option<RawOptions>,
}

/// Orchestrates a song request: resolve the song and lyrics through the
/// catalog fallback chain, then romanize title, artist and every lyric
/// line.
pub struct MusicRomanizationPipeline {
    detector: ScriptDetector,
    engines: Arc<EngineRegistry>,
    resolver: Arc<FallbackResolver>,
    cache: Arc<dyn CacheStore>,
    cache_ttl_secs: Option<u64>,
}

impl MusicRomanizationPipeline {
    pub fn new(
        engines: Arc<EngineRegistry>,
        resolver: Arc<FallbackResolver>,
        cache: Arc<dyn CacheStore>,
        cache_ttl_secs: Option<u64>,
    ) -> Self {
        Self {
            detector: ScriptDetector::new(),
            engines,
            resolver,
            cache,
            cache_ttl_secs,
        }
    }

    pub async fn handle(&self, request: &MusicRequest) -> Result<Value, PipelineError> {
        let artist = match request.artist.as_deref().map(str::trim) {
            Some(artist) if !artist.is_empty() => artist,
            _ => {
                return Err(PipelineError::InvalidInput(
                    "Artist and title are required".to_string(),
                ))
            }
        };
        let title = match request.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => {
                return Err(PipelineError::InvalidInput(
                    "Artist and title are required".to_string(),
                ))
            }
        };

        let detection_text = format!("{} {}", artist, title);
        let script = resolve_script(&self.detector, request.language.as_deref(), &detection_text)?;
        let options = resolve_options(request.options.as_ref())?;
        let system = resolve_system(request.romanization_system.as_deref(), script)?;
        let sources = self
            .resolver
            .sources_for(script, request.music_platform.as_deref())?;
        let engine = resolve_engine(&self.engines, script, system)?;

        let key_text = format!("{}-{}", artist, title);
        let key = cache_key(MUSIC_NAMESPACE, &key_text, script, system, &options);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(script = %script, %artist, %title, "Music romanization cache hit");
            return Ok(cached);
        }

        let (song, winner) = self.resolver.find_song(&sources, artist, title).await?;
        let lyrics = self.resolver.get_lyrics(&winner, &song.id).await?;

        let title_romanized = engine
            .romanize(&song.title, system, &options)
            .map_err(|err| engine_failure(err, script))?;
        let artist_romanized = engine
            .romanize(&song.artist, system, &options)
            .map_err(|err| engine_failure(err, script))?;
        let lines = romanize_lines(engine, &lyrics, script, system, &options).await?;

        let response = ResponseAssembler::music_response(
            &song,
            &title_romanized.romanized,
            &artist_romanized.romanized,
            script,
            system,
            lines,
        );
        self.cache.set(&key, &response, self.cache_ttl_secs).await;
        Ok(response)
    }
}

/// Fans the per-line conversions out concurrently, then reassembles by
/// original index so output order never depends on completion order.
/// Blank lines are dropped before dispatch.
async fn romanize_lines(
    engine: &dyn TransliterationEngine,
    lyrics: &LyricsDocument,
    script: ScriptCode,
    system: RomanizationSystem,
    options: &RomanizationOptions,
) -> Result<Vec<RomanizedLine>, PipelineError> {
    let tasks = lyrics
        .lines
        .iter()
        .filter(|line| !line.text.trim().is_empty())
        .enumerate()
        .map(|(index, line)| async move {
            let result = engine.romanize(&line.text, system, options);
            (index, line, result)
        });

    let mut completed = join_all(tasks).await;
    completed.sort_by_key(|(index, _, _)| *index);

    completed
        .into_iter()
        .map(|(_, line, result)| {
            let result = result.map_err(|err| engine_failure(err, script))?;
            Ok(RomanizedLine {
                original: line.text.clone(),
                romanized: result.romanized,
                timestamp: line.timestamp,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::MemoryCacheStore;
    use crate::source::test_support::{song, ScriptedSource};
    use crate::source::{LyricsLine, SongSource, SourceRegistry};
    use serde_json::json;

    fn lyrics(lines: &[(&str, Option<f64>)]) -> LyricsDocument {
        LyricsDocument {
            lines: lines
                .iter()
                .map(|(text, timestamp)| LyricsLine {
                    text: text.to_string(),
                    timestamp: *timestamp,
                })
                .collect(),
        }
    }

    fn pipeline_with(
        sources: Vec<Arc<dyn SongSource>>,
        order: Vec<&str>,
        cache: Arc<MemoryCacheStore>,
    ) -> MusicRomanizationPipeline {
        let mut registry = SourceRegistry::new();
        for source in sources {
            registry.register(source);
        }
        registry.set_priority(ScriptCode::Zh, order);
        MusicRomanizationPipeline::new(
            Arc::new(EngineRegistry::with_default_engines()),
            Arc::new(FallbackResolver::new(registry)),
            cache,
            Some(3600),
        )
    }

    fn request() -> MusicRequest {
        MusicRequest {
            artist: Some("邓丽君".to_string()),
            title: Some("月亮".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn song_and_lyrics_are_romanized_in_order() {
        let source = Arc::new(
            ScriptedSource::new("netease", vec![ScriptCode::Zh])
                .with_song(song("netease"))
                .with_lyrics(lyrics(&[
                    ("你好", Some(1.0)),
                    ("   ", Some(2.0)),
                    ("月亮", Some(3.0)),
                ])),
        );
        let cache = Arc::new(MemoryCacheStore::new());
        let pipeline = pipeline_with(vec![source], vec!["netease"], cache.clone());

        let body = pipeline.handle(&request()).await.unwrap();
        let lines = body["lines"].as_array().unwrap();
        // The blank line is dropped, the rest keep their order.
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["original"], "你好");
        assert_eq!(lines[0]["romanized"], "nǐ hǎo");
        assert_eq!(lines[1]["original"], "月亮");
        assert_eq!(body["song"]["language"], "zh");
        assert_eq!(body["quality"]["synced"], true);
        assert_eq!(body["metadata"]["source"], "netease");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn missing_artist_is_rejected() {
        let pipeline = pipeline_with(vec![], vec![], Arc::new(MemoryCacheStore::new()));
        let req = MusicRequest {
            title: Some("月亮".to_string()),
            ..Default::default()
        };
        let err = pipeline.handle(&req).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn exhausted_sources_name_every_attempt() {
        let first = Arc::new(ScriptedSource::new("netease", vec![ScriptCode::Zh]));
        let second = Arc::new(ScriptedSource::new("lrclib", vec![ScriptCode::Zh]));
        let pipeline = pipeline_with(
            vec![first, second],
            vec!["netease", "lrclib"],
            Arc::new(MemoryCacheStore::new()),
        );

        let err = pipeline.handle(&request()).await.unwrap_err();
        assert_eq!(err.status(), 404);
        assert!(err.to_string().contains("netease"));
        assert!(err.to_string().contains("lrclib"));
    }

    #[tokio::test]
    async fn cache_hit_skips_the_sources() {
        let source = Arc::new(
            ScriptedSource::new("netease", vec![ScriptCode::Zh])
                .with_song(song("netease"))
                .with_lyrics(lyrics(&[("你好", None)])),
        );
        let counted = source.clone();
        let cache = Arc::new(MemoryCacheStore::new());
        let pipeline = pipeline_with(vec![source], vec!["netease"], cache.clone());

        pipeline.handle(&request()).await.unwrap();
        assert_eq!(counted.search_calls(), 1);

        let second = pipeline.handle(&request()).await.unwrap();
        assert_eq!(counted.search_calls(), 1);
        assert_eq!(second["song"]["title"]["original"], "月亮代表我的心");
    }

    #[tokio::test]
    async fn source_resolution_precedes_the_cache_lookup() {
        let cache = Arc::new(MemoryCacheStore::new());
        let pipeline = pipeline_with(vec![], vec![], cache.clone());
        let key = cache_key(
            MUSIC_NAMESPACE,
            "邓丽君-月亮",
            ScriptCode::Zh,
            RomanizationSystem::Pinyin,
            &RomanizationOptions::default(),
        );
        cache.insert(&key, json!({"song": "cached"}));

        let mut req = request();
        req.language = Some("zh".to_string());
        let err = pipeline.handle(&req).await.unwrap_err();
        // Capability checks run before the cache, so a cached entry
        // cannot mask a script with no configured source.
        assert!(matches!(
            err,
            PipelineError::Resolve(crate::source::ResolveError::NoSourceForScript { .. })
        ));
    }

    #[tokio::test]
    async fn lyrics_failure_is_a_not_found() {
        let source = Arc::new(
            ScriptedSource::new("netease", vec![ScriptCode::Zh]).with_song(song("netease")),
        );
        let pipeline = pipeline_with(
            vec![source],
            vec!["netease"],
            Arc::new(MemoryCacheStore::new()),
        );
        let err = pipeline.handle(&request()).await.unwrap_err();
        assert_eq!(err.status(), 404);
        assert!(err.to_string().contains("netease"));
    }

    #[tokio::test]
    async fn unknown_platform_is_rejected() {
        let source = Arc::new(
            ScriptedSource::new("netease", vec![ScriptCode::Zh]).with_song(song("netease")),
        );
        let pipeline = pipeline_with(
            vec![source],
            vec!["netease"],
            Arc::new(MemoryCacheStore::new()),
        );
        let mut req = request();
        req.music_platform = Some("spotify".to_string());
        let err = pipeline.handle(&req).await.unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[tokio::test]
    async fn plain_lyrics_yield_an_unsynced_response() {
        let source = Arc::new(
            ScriptedSource::new("netease", vec![ScriptCode::Zh])
                .with_song(song("netease"))
                .with_lyrics(lyrics(&[("你好", None), ("月亮", None)])),
        );
        let pipeline = pipeline_with(
            vec![source],
            vec!["netease"],
            Arc::new(MemoryCacheStore::new()),
        );
        let body = pipeline.handle(&request()).await.unwrap();
        assert_eq!(body["quality"]["synced"], false);
    }
}
