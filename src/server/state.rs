use axum::extract::FromRef;

use crate::pipeline::{MusicRomanizationPipeline, RomanizationPipeline};
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedTextPipeline = Arc<RomanizationPipeline>;
pub type GuardedMusicPipeline = Arc<MusicRomanizationPipeline>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub text_pipeline: GuardedTextPipeline,
    pub music_pipeline: GuardedMusicPipeline,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedTextPipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.text_pipeline.clone()
    }
}

impl FromRef<ServerState> for GuardedMusicPipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.music_pipeline.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
