use anyhow::Result;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::pipeline::{MusicRequest, PipelineError, ResponseAssembler, TextRequest};

use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(stats)
}

fn pipeline_response(result: Result<Value, PipelineError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(ResponseAssembler::error_body(&err))).into_response()
        }
    }
}

async fn romanize(
    State(pipeline): State<GuardedTextPipeline>,
    Json(body): Json<TextRequest>,
) -> Response {
    pipeline_response(pipeline.handle(&body).await)
}

async fn music_romanize(
    State(pipeline): State<GuardedMusicPipeline>,
    Json(body): Json<MusicRequest>,
) -> Response {
    pipeline_response(pipeline.handle(&body).await)
}

fn make_app(
    config: ServerConfig,
    text_pipeline: GuardedTextPipeline,
    music_pipeline: GuardedMusicPipeline,
) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        text_pipeline,
        music_pipeline,
        hash: env!("GIT_HASH").to_string(),
    };

    Router::new()
        .route("/", get(home))
        .route("/romanize", post(romanize))
        .route("/music-romanize", post(music_romanize))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    config: ServerConfig,
    text_pipeline: GuardedTextPipeline,
    music_pipeline: GuardedMusicPipeline,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, text_pipeline, music_pipeline);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoopCacheStore;
    use crate::engine::EngineRegistry;
    use crate::pipeline::{MusicRomanizationPipeline, RomanizationPipeline};
    use crate::source::{FallbackResolver, SourceRegistry};
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let engines = Arc::new(EngineRegistry::with_default_engines());
        let cache = Arc::new(NoopCacheStore);
        let resolver = Arc::new(FallbackResolver::new(SourceRegistry::new()));
        let text_pipeline = Arc::new(RomanizationPipeline::new(
            engines.clone(),
            cache.clone(),
            None,
        ));
        let music_pipeline = Arc::new(MusicRomanizationPipeline::new(
            engines, resolver, cache, None,
        ));
        make_app(ServerConfig::default(), text_pipeline, music_pipeline)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn home_reports_uptime_and_version() {
        let app = test_app();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["uptime"].as_str().unwrap().contains('d'));
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn romanize_accepts_only_post() {
        let app = test_app();
        let request = Request::builder()
            .uri("/romanize")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn music_romanize_accepts_only_post() {
        let app = test_app();
        let request = Request::builder()
            .uri("/music-romanize")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn romanize_converts_mandarin_end_to_end() {
        let app = test_app();
        let request = post_json("/romanize", serde_json::json!({"text": "你好"}));
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["romanized"], "nǐ hǎo");
        assert_eq!(body["language"], "zh");
        assert_eq!(body["romanization_system"], "pinyin");
    }

    #[tokio::test]
    async fn missing_text_yields_the_error_envelope() {
        let app = test_app();
        let request = post_json("/romanize", serde_json::json!({}));
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 400);
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn music_with_no_sources_is_a_bad_request() {
        let app = test_app();
        let request = post_json(
            "/music-romanize",
            serde_json::json!({"artist": "邓丽君", "title": "月亮"}),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 400);
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 01:01:01");
    }
}
