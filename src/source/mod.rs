//! Song sources: external lyric catalogs behind a uniform contract,
//! plus the ordered-fallback resolution across them.

mod lrc;
mod lrclib;
mod netease;

pub use lrc::{is_metadata_or_credit, parse_lrc, parse_plain};
pub use lrclib::LrcLibSource;
pub use netease::NeteaseSource;

use crate::script::ScriptCode;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// A resolved track. `id` is only meaningful together with `source`:
/// ids are source-scoped and not portable across catalogs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration_secs: Option<u64>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LyricsLine {
    pub text: String,
    pub timestamp: Option<f64>,
}

/// Ordered lyric lines as provided by a source, credits already
/// filtered out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LyricsDocument {
    pub lines: Vec<LyricsLine>,
}

impl LyricsDocument {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the source provided synchronized timestamps.
    pub fn synced(&self) -> bool {
        self.lines.iter().any(|l| l.timestamp.is_some())
    }
}

/// One external catalog. Implementations normalize their results into
/// [`Song`]/[`LyricsDocument`] and report "no match" as `Ok(None)`;
/// transport failures are `Err` and get swallowed by the resolver.
#[async_trait]
pub trait SongSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn supports_language(&self, script: ScriptCode) -> bool;

    async fn search_song(&self, artist: &str, title: &str) -> Result<Option<Song>>;

    async fn get_lyrics(&self, song_id: &str) -> Result<Option<LyricsDocument>>;
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Platform '{platform}' is not available for script '{script}'")]
    PlatformUnavailable { platform: String, script: ScriptCode },

    #[error("No music source available for script '{script}'")]
    NoSourceForScript { script: ScriptCode },

    #[error("Song not found (sources attempted: {})", attempted.join(", "))]
    SongNotFound { attempted: Vec<String> },

    #[error("Lyrics not found on source '{source_name}'")]
    LyricsNotFound { source_name: String },
}

/// Maps script codes to a priority-ordered list of sources. Cheaper
/// sources rank first; the order is the fallback order.
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn SongSource>>,
    priorities: HashMap<ScriptCode, Vec<String>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            priorities: HashMap::new(),
        }
    }

    /// Registry with the built-in catalogs and the default priority
    /// table.
    pub fn with_default_sources(timeout_secs: u64) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NeteaseSource::new(timeout_secs)));
        registry.register(Arc::new(LrcLibSource::new(timeout_secs)));
        registry.set_priority(ScriptCode::Zh, vec!["netease", "lrclib"]);
        registry.set_priority(ScriptCode::Yue, vec!["netease"]);
        registry.set_priority(ScriptCode::Ja, vec!["lrclib"]);
        registry.set_priority(ScriptCode::Ko, vec!["lrclib"]);
        registry.set_priority(ScriptCode::En, vec!["netease", "lrclib"]);
        registry.set_priority(ScriptCode::Ru, vec![]);
        registry
    }

    pub fn register(&mut self, source: Arc<dyn SongSource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    pub fn set_priority(&mut self, script: ScriptCode, platforms: Vec<&str>) {
        self.priorities
            .insert(script, platforms.into_iter().map(String::from).collect());
    }

    /// Ordered source list for a script. An explicit platform narrows
    /// the list to that single source, or fails if the platform does not
    /// exist or does not declare support for the script.
    pub fn resolve(
        &self,
        script: ScriptCode,
        explicit_platform: Option<&str>,
    ) -> Result<Vec<Arc<dyn SongSource>>, ResolveError> {
        if let Some(platform) = explicit_platform {
            let source = self
                .sources
                .get(platform)
                .filter(|s| s.supports_language(script))
                .ok_or_else(|| ResolveError::PlatformUnavailable {
                    platform: platform.to_string(),
                    script,
                })?;
            return Ok(vec![source.clone()]);
        }

        let ordered = self
            .priorities
            .get(&script)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| self.sources.get(name))
                    .filter(|s| s.supports_language(script))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(ordered)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Tries sources in priority order until one yields a song, then
/// fetches lyrics from that winning source only.
pub struct FallbackResolver {
    registry: SourceRegistry,
}

impl FallbackResolver {
    pub fn new(registry: SourceRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the ordered source list; empty means the script has no
    /// configured catalog at all.
    pub fn sources_for(
        &self,
        script: ScriptCode,
        explicit_platform: Option<&str>,
    ) -> Result<Vec<Arc<dyn SongSource>>, ResolveError> {
        let sources = self.registry.resolve(script, explicit_platform)?;
        if sources.is_empty() {
            return Err(ResolveError::NoSourceForScript { script });
        }
        Ok(sources)
    }

    /// Sequential short-circuit search: the first source that returns a
    /// match wins and later sources are never called. Per-source
    /// failures are logged and treated as "no result".
    pub async fn find_song(
        &self,
        sources: &[Arc<dyn SongSource>],
        artist: &str,
        title: &str,
    ) -> Result<(Song, Arc<dyn SongSource>), ResolveError> {
        let mut attempted = Vec::new();
        for source in sources {
            attempted.push(source.name().to_string());
            match source.search_song(artist, title).await {
                Ok(Some(song)) => {
                    info!(source = source.name(), %artist, %title, "Song matched");
                    return Ok((song, source.clone()));
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(source = source.name(), error = %err, "Song search failed, trying next source");
                }
            }
        }
        Err(ResolveError::SongNotFound { attempted })
    }

    /// Lyrics come from the winning source only; ids do not transfer to
    /// other catalogs, so there is no retry against the rest of the
    /// list.
    pub async fn get_lyrics(
        &self,
        source: &Arc<dyn SongSource>,
        song_id: &str,
    ) -> Result<LyricsDocument, ResolveError> {
        match source.get_lyrics(song_id).await {
            Ok(Some(lyrics)) if !lyrics.is_empty() => Ok(lyrics),
            Ok(_) => Err(ResolveError::LyricsNotFound {
                source_name: source.name().to_string(),
            }),
            Err(err) => {
                warn!(source = source.name(), error = %err, "Lyrics fetch failed");
                Err(ResolveError::LyricsNotFound {
                    source_name: source.name().to_string(),
                })
            }
        }
    }
}
