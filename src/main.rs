use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cache;
use cache::{CacheStore, NoopCacheStore, RestCacheStore};

mod config;
use config::{AppConfig, CliConfig, FileConfig};

mod engine;
use engine::EngineRegistry;

mod pipeline;
use pipeline::{MusicRomanizationPipeline, RomanizationPipeline};

mod script;

mod server;
use server::{run_server, RequestsLoggingLevel, ServerConfig};

mod source;
use source::{FallbackResolver, SourceRegistry};

#[derive(Parser, Debug)]
struct CliArgs {
    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to a TOML config file. File values override CLI values.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// REST endpoint of the cache backend.
    #[clap(long)]
    pub cache_url: Option<String>,

    /// Bearer token for the cache backend.
    #[clap(long)]
    pub cache_token: Option<String>,

    /// Cache entry lifetime in seconds. Omit for no expiry.
    #[clap(long)]
    pub cache_ttl_sec: Option<u64>,

    /// Timeout in seconds for song catalog requests.
    #[clap(long, default_value_t = 10)]
    pub upstream_timeout_sec: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        upstream_timeout_sec: cli_args.upstream_timeout_sec,
        cache_url: cli_args.cache_url,
        cache_token: cli_args.cache_token,
        cache_ttl_sec: cli_args.cache_ttl_sec,
    };
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    let cache: Arc<dyn CacheStore> = match &app_config.cache {
        Some(settings) => {
            info!("Cache backend configured at {}", settings.url);
            Arc::new(RestCacheStore::new(
                settings.url.clone(),
                settings.token.clone(),
            ))
        }
        None => {
            info!("No cache backend configured, caching disabled");
            Arc::new(NoopCacheStore)
        }
    };

    let engines = Arc::new(EngineRegistry::with_default_engines());
    let sources = SourceRegistry::with_default_sources(app_config.upstream_timeout_sec);
    let resolver = Arc::new(FallbackResolver::new(sources));

    let text_pipeline = Arc::new(RomanizationPipeline::new(
        engines.clone(),
        cache.clone(),
        app_config.cache_ttl_sec,
    ));
    let music_pipeline = Arc::new(MusicRomanizationPipeline::new(
        engines,
        resolver,
        cache,
        app_config.cache_ttl_sec,
    ));

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level,
        port: app_config.port,
    };

    info!("Ready to serve at port {}!", server_config.port);
    run_server(server_config, text_pipeline, music_pipeline).await
}
