//! lrclib.net catalog client.
//!
//! The search payload already carries the lyrics, so the last best match
//! is kept around to avoid a second round trip when the pipeline asks
//! for the lyrics of the song it just found.

use super::lrc::{parse_lrc, parse_plain};
use super::{LyricsDocument, Song, SongSource};
use crate::script::ScriptCode;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://lrclib.net/api";

#[derive(Debug)]
pub struct LrcLibSource {
    client: reqwest::Client,
    base_url: String,
    last_match: Mutex<Option<LrcLibTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LrcLibTrack {
    id: i64,
    name: Option<String>,
    #[serde(default)]
    track_name: Option<String>,
    artist_name: String,
    album_name: Option<String>,
    duration: Option<f64>,
    synced_lyrics: Option<String>,
    plain_lyrics: Option<String>,
}

impl LrcLibTrack {
    fn title(&self) -> &str {
        self.name
            .as_deref()
            .or(self.track_name.as_deref())
            .unwrap_or("")
    }

    fn lyrics(&self) -> Option<LyricsDocument> {
        let lines = if let Some(synced) = self.synced_lyrics.as_deref() {
            parse_lrc(synced)
        } else if let Some(plain) = self.plain_lyrics.as_deref() {
            parse_plain(plain)
        } else {
            return None;
        };
        if lines.is_empty() {
            None
        } else {
            Some(LyricsDocument { lines })
        }
    }
}

impl LrcLibSource {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            last_match: Mutex::new(None),
        }
    }

    /// Exact containment match first, then artist+title partial match,
    /// else the first result.
    fn best_match(tracks: Vec<LrcLibTrack>, artist: &str, title: &str) -> Option<LrcLibTrack> {
        let wanted = format!("{} {}", artist, title).to_lowercase();

        for track in &tracks {
            let candidate = format!("{} {}", track.artist_name, track.title()).to_lowercase();
            if candidate.contains(&wanted) || wanted.contains(&candidate) {
                return Some(track.clone());
            }
        }
        for track in &tracks {
            let artist_match = track
                .artist_name
                .to_lowercase()
                .contains(&artist.to_lowercase());
            let title_match = track.title().to_lowercase().contains(&title.to_lowercase());
            if artist_match && title_match {
                return Some(track.clone());
            }
        }
        tracks.into_iter().next()
    }
}

#[async_trait]
impl SongSource for LrcLibSource {
    fn name(&self) -> &'static str {
        "lrclib"
    }

    fn supports_language(&self, script: ScriptCode) -> bool {
        matches!(
            script,
            ScriptCode::Zh | ScriptCode::En | ScriptCode::Ja | ScriptCode::Ko
        )
    }

    async fn search_song(&self, artist: &str, title: &str) -> Result<Option<Song>> {
        let query = urlencoding::encode(&format!("{} {}", artist, title)).into_owned();
        let url = format!("{}/search?q={}", self.base_url, query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach lrclib search")?;
        if !response.status().is_success() {
            anyhow::bail!("Lrclib search failed with status {}", response.status());
        }

        let tracks: Vec<LrcLibTrack> = response
            .json()
            .await
            .context("Failed to parse lrclib search response")?;
        debug!(results = tracks.len(), "Lrclib search results");

        let best = match Self::best_match(tracks, artist, title) {
            Some(track) => track,
            None => return Ok(None),
        };

        let song = Song {
            id: best.id.to_string(),
            title: best.title().to_string(),
            artist: best.artist_name.clone(),
            album: best.album_name.clone(),
            duration_secs: best.duration.map(|d| d as u64),
            source: self.name().to_string(),
        };
        *self.last_match.lock().unwrap() = Some(best);
        Ok(Some(song))
    }

    async fn get_lyrics(&self, song_id: &str) -> Result<Option<LyricsDocument>> {
        // Lyrics usually arrive with the search payload.
        let cached = self
            .last_match
            .lock()
            .unwrap()
            .as_ref()
            .filter(|track| track.id.to_string() == song_id)
            .cloned();
        if let Some(track) = cached {
            debug!(song_id, "Using lyrics from the search payload");
            return Ok(track.lyrics());
        }

        let url = format!("{}/get/{}", self.base_url, song_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach lrclib get endpoint")?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let track: LrcLibTrack = response
            .json()
            .await
            .context("Failed to parse lrclib track response")?;
        Ok(track.lyrics())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: i64, artist: &str, title: &str) -> LrcLibTrack {
        LrcLibTrack {
            id,
            name: Some(title.to_string()),
            track_name: None,
            artist_name: artist.to_string(),
            album_name: None,
            duration: Some(200.0),
            synced_lyrics: None,
            plain_lyrics: None,
        }
    }

    #[test]
    fn exact_containment_wins_over_order() {
        let tracks = vec![
            track(1, "Cover Band", "Lemon karaoke version"),
            track(2, "米津玄師", "Lemon"),
        ];
        let best = LrcLibSource::best_match(tracks, "米津玄師", "Lemon").unwrap();
        assert_eq!(best.id, 2);
    }

    #[test]
    fn partial_match_requires_both_artist_and_title() {
        let tracks = vec![
            track(1, "Somebody Else", "Lemon"),
            track(2, "The 米津玄師 Band", "Lemon (live)"),
        ];
        let best = LrcLibSource::best_match(tracks, "米津玄師", "Lemon").unwrap();
        assert_eq!(best.id, 2);
    }

    #[test]
    fn falls_back_to_first_result() {
        let tracks = vec![track(7, "A", "B"), track(8, "C", "D")];
        let best = LrcLibSource::best_match(tracks, "X", "Y").unwrap();
        assert_eq!(best.id, 7);
    }

    #[test]
    fn synced_lyrics_are_preferred_over_plain() {
        let mut t = track(1, "a", "b");
        t.synced_lyrics = Some("[00:10.00]line one".to_string());
        t.plain_lyrics = Some("ignored".to_string());
        let lyrics = t.lyrics().unwrap();
        assert!(lyrics.synced());
        assert_eq!(lyrics.lines[0].text, "line one");
    }

    #[test]
    fn plain_lyrics_have_no_timestamps() {
        let mut t = track(1, "a", "b");
        t.plain_lyrics = Some("one\ntwo".to_string());
        let lyrics = t.lyrics().unwrap();
        assert!(!lyrics.synced());
        assert_eq!(lyrics.lines.len(), 2);
    }
}
