mod file_config;

pub use file_config::{CacheConfig, FileConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::Result;
use clap::ValueEnum;

/// Environment variables the cache backend credentials fall back to
/// when neither the config file nor the CLI provides them.
const CACHE_URL_ENV: &str = "KV_REST_API_URL";
const CACHE_TOKEN_ENV: &str = "KV_REST_API_TOKEN";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub upstream_timeout_sec: u64,
    pub cache_url: Option<String>,
    pub cache_token: Option<String>,
    pub cache_ttl_sec: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub upstream_timeout_sec: u64,
    pub cache: Option<CacheSettings>,
    pub cache_ttl_sec: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub url: String,
    pub token: String,
}

fn parse_logging_level(value: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(value, true).ok()
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present; cache credentials
    /// additionally fall back to the environment.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let env_url = std::env::var(CACHE_URL_ENV).ok();
        let env_token = std::env::var(CACHE_TOKEN_ENV).ok();
        Self::resolve_with_env(cli, file_config, env_url, env_token)
    }

    fn resolve_with_env(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        env_url: Option<String>,
        env_token: Option<String>,
    ) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let upstream_timeout_sec = file.upstream_timeout_sec.unwrap_or(cli.upstream_timeout_sec);

        let file_cache = file.cache.unwrap_or_default();
        let cache_url = file_cache
            .url
            .or_else(|| cli.cache_url.clone())
            .or(env_url);
        let cache_token = file_cache
            .token
            .or_else(|| cli.cache_token.clone())
            .or(env_token);

        // Both credentials or no caching. A partial pair degrades to
        // "no caching" so a misconfigured backend cannot fail requests.
        let cache = match (cache_url, cache_token) {
            (Some(url), Some(token)) => Some(CacheSettings { url, token }),
            _ => None,
        };

        let cache_ttl_sec = file_cache.ttl_sec.or(cli.cache_ttl_sec);

        Ok(AppConfig {
            port,
            logging_level,
            upstream_timeout_sec,
            cache,
            cache_ttl_sec,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> CliConfig {
        CliConfig {
            port: 3000,
            logging_level: RequestsLoggingLevel::Path,
            upstream_timeout_sec: 10,
            cache_url: None,
            cache_token: None,
            cache_ttl_sec: None,
        }
    }

    #[test]
    fn cli_values_apply_without_a_file() {
        let config = AppConfig::resolve_with_env(&cli(), None, None, None).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_timeout_sec, 10);
        assert!(config.cache.is_none());
        assert!(config.cache_ttl_sec.is_none());
    }

    #[test]
    fn file_values_override_cli() {
        let file: FileConfig = toml::from_str(
            r#"
            port = 8080
            logging_level = "headers"
            [cache]
            url = "https://cache.example.com"
            token = "secret"
            ttl_sec = 3600
            "#,
        )
        .unwrap();
        let config = AppConfig::resolve_with_env(&cli(), Some(file), None, None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        let cache = config.cache.unwrap();
        assert_eq!(cache.url, "https://cache.example.com");
        assert_eq!(cache.token, "secret");
        assert_eq!(config.cache_ttl_sec, Some(3600));
    }

    #[test]
    fn environment_backfills_cache_credentials() {
        let config = AppConfig::resolve_with_env(
            &cli(),
            None,
            Some("https://cache.example.com".to_string()),
            Some("secret".to_string()),
        )
        .unwrap();
        assert!(config.cache.is_some());
    }

    #[test]
    fn partial_cache_credentials_disable_caching() {
        let config = AppConfig::resolve_with_env(
            &cli(),
            None,
            Some("https://cache.example.com".to_string()),
            None,
        )
        .unwrap();
        assert!(config.cache.is_none());
    }

    #[test]
    fn cli_cache_credentials_beat_the_environment() {
        let mut args = cli();
        args.cache_url = Some("https://cli.example.com".to_string());
        args.cache_token = Some("cli-token".to_string());
        let config = AppConfig::resolve_with_env(
            &args,
            None,
            Some("https://env.example.com".to_string()),
            Some("env-token".to_string()),
        )
        .unwrap();
        assert_eq!(config.cache.unwrap().url, "https://cli.example.com");
    }
}
