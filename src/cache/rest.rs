//! Redis-over-REST cache backend (Upstash-style API).
//!
//! Commands are POSTed as JSON arrays with bearer auth; `get` uses the
//! dedicated path endpoint. All errors degrade to miss/no-op.

use super::CacheStore;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RestCacheStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    result: Option<Value>,
}

impl RestCacheStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: token.into(),
        }
    }

    async fn run_command(&self, command: Value) -> Result<Option<Value>, reqwest::Error> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await?
            .error_for_status()?;
        let body: CommandResponse = response.json().await?;
        Ok(body.result)
    }
}

#[async_trait]
impl CacheStore for RestCacheStore {
    async fn get(&self, key: &str) -> Option<Value> {
        let url = format!("{}/get/{}", self.base_url, key);
        let response = match self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Cache retrieval error");
                return None;
            }
        };

        let body: CommandResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "Cache response parse error");
                return None;
            }
        };

        // Values are stored as serialized JSON strings.
        match body.result {
            Some(Value::String(raw)) => serde_json::from_str(&raw).ok(),
            Some(other) => Some(other),
            None => None,
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl_secs: Option<u64>) {
        let serialized = value.to_string();
        let command = match ttl_secs {
            Some(ttl) => json!(["SET", key, serialized, "EX", ttl]),
            None => json!(["SET", key, serialized]),
        };
        if let Err(err) = self.run_command(command).await {
            warn!(error = %err, "Cache storage error");
        }
    }
}
