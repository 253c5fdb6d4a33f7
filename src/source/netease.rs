//! Netease Cloud Music catalog client.

use super::lrc::{is_metadata_or_credit, parse_lrc};
use super::{LyricsDocument, Song, SongSource};
use crate::script::ScriptCode;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://netease-cloud-music-api-gules-mu.vercel.app";

#[derive(Debug)]
pub struct NeteaseSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    code: i64,
    result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    songs: Option<Vec<NeteaseSong>>,
}

#[derive(Debug, Deserialize)]
struct NeteaseSong {
    id: i64,
    name: String,
    artists: Option<Vec<NeteaseArtist>>,
    album: Option<NeteaseAlbum>,
    /// Milliseconds.
    duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct NeteaseArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct NeteaseAlbum {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LyricResponse {
    code: i64,
    lrc: Option<Lrc>,
}

#[derive(Debug, Deserialize)]
struct Lrc {
    lyric: Option<String>,
}

impl NeteaseSource {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl SongSource for NeteaseSource {
    fn name(&self) -> &'static str {
        "netease"
    }

    fn supports_language(&self, script: ScriptCode) -> bool {
        matches!(script, ScriptCode::Zh | ScriptCode::Yue | ScriptCode::En)
    }

    async fn search_song(&self, artist: &str, title: &str) -> Result<Option<Song>> {
        let keywords = urlencoding::encode(&format!("{} {}", artist, title)).into_owned();
        let url = format!("{}/search?keywords={}", self.base_url, keywords);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach netease search")?;
        if !response.status().is_success() {
            anyhow::bail!("Netease search failed with status {}", response.status());
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse netease search response")?;
        if body.code != 200 {
            return Ok(None);
        }

        let song = match body.result.and_then(|r| r.songs).and_then(|mut s| {
            if s.is_empty() {
                None
            } else {
                Some(s.remove(0))
            }
        }) {
            Some(song) => song,
            None => return Ok(None),
        };

        Ok(Some(Song {
            id: song.id.to_string(),
            title: song.name,
            artist: song
                .artists
                .and_then(|a| a.into_iter().next())
                .map(|a| a.name)
                .unwrap_or_else(|| artist.to_string()),
            album: song.album.map(|a| a.name),
            duration_secs: song.duration.map(|ms| ms / 1000),
            source: self.name().to_string(),
        }))
    }

    async fn get_lyrics(&self, song_id: &str) -> Result<Option<LyricsDocument>> {
        let url = format!("{}/lyric?id={}", self.base_url, song_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach netease lyric endpoint")?;
        if !response.status().is_success() {
            anyhow::bail!("Netease lyric fetch failed with status {}", response.status());
        }

        let body: LyricResponse = response
            .json()
            .await
            .context("Failed to parse netease lyric response")?;
        let raw = match (body.code, body.lrc.and_then(|l| l.lyric)) {
            (200, Some(raw)) if !raw.trim().is_empty() => raw,
            _ => return Ok(None),
        };

        let lines = parse_lrc(&raw)
            .into_iter()
            .filter(|line| !is_metadata_or_credit(&line.text))
            .collect::<Vec<_>>();
        if lines.is_empty() {
            return Ok(None);
        }
        Ok(Some(LyricsDocument { lines }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let source = NeteaseSource::with_base_url("http://localhost:8080/", 10);
        assert_eq!(source.base_url, "http://localhost:8080");
    }

    #[test]
    fn search_response_parses_netease_shape() {
        let json = r#"{
            "code": 200,
            "result": {
                "songs": [{
                    "id": 5257138,
                    "name": "月亮代表我的心",
                    "artists": [{"name": "邓丽君"}],
                    "album": {"name": "淡淡幽情"},
                    "duration": 219000
                }]
            }
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.code, 200);
        let song = parsed.result.unwrap().songs.unwrap().remove(0);
        assert_eq!(song.id, 5257138);
        assert_eq!(song.duration, Some(219000));
    }

    #[test]
    fn lyric_response_tolerates_missing_lrc() {
        let parsed: LyricResponse = serde_json::from_str(r#"{"code": 200}"#).unwrap();
        assert!(parsed.lrc.is_none());
    }
}
