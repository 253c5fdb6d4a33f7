//! Content-addressed response cache.
//!
//! Caching is an optimization, never a correctness dependency: every
//! backend failure is logged and behaves like a miss (on get) or a no-op
//! (on set), so a cache outage is invisible to callers except as
//! latency.

mod key;
mod rest;

pub use key::{cache_key, MUSIC_NAMESPACE, TEXT_NAMESPACE};
pub use rest::RestCacheStore;

use async_trait::async_trait;
use serde_json::Value;

/// Best-effort key/value store. Implementations must be safe for
/// concurrent use; values are full response payloads.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `None` means miss or outage; callers cannot tell the difference
    /// and must recompute either way.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Best effort; failures are logged, never surfaced.
    async fn set(&self, key: &str, value: &Value, ttl_secs: Option<u64>);
}

/// Stand-in when no cache backend is configured: every get misses,
/// every set is dropped.
pub struct NoopCacheStore;

#[async_trait]
impl CacheStore for NoopCacheStore {
    async fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    async fn set(&self, _key: &str, _value: &Value, _ttl_secs: Option<u64>) {}
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store for pipeline tests.
    #[derive(Default)]
    pub struct MemoryCacheStore {
        entries: Mutex<HashMap<String, Value>>,
    }

    impl MemoryCacheStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        pub fn insert(&self, key: &str, value: Value) {
            self.entries.lock().unwrap().insert(key.to_string(), value);
        }
    }

    #[async_trait]
    impl CacheStore for MemoryCacheStore {
        async fn get(&self, key: &str) -> Option<Value> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        async fn set(&self, key: &str, value: &Value, _ttl_secs: Option<u64>) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.clone());
        }
    }
}
