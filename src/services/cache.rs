// src/services/cache.rs
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;

use super::FetchError;

struct CacheEntry<T> {
    stored_at: DateTime<Utc>,
    ttl: Duration,
    result: Result<T, FetchError>,
}

/// Process-wide TTL memoization of feed results.
///
/// Failed fetches are cached too, so a down endpoint is not hammered every
/// cycle, but they expire after one fifth of the success TTL (60s at the
/// 300s default) so recovery is observed within a minute.
pub struct FeedCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> FeedCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached result for `key` if it is still inside its TTL,
    /// otherwise invoke `fetch` and cache whatever it returns.
    ///
    /// The lock is held across the fetch: the TTL check and the store are
    /// atomic, so concurrent callers inside the window cannot double-fetch.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<T, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(key) {
            if Utc::now() - entry.stored_at < entry.ttl {
                debug!("Feed cache hit for '{}'", key);
                return entry.result.clone();
            }
        }

        info!("Feed cache miss for '{}', fetching", key);
        let result = fetch().await;
        let effective_ttl = if result.is_ok() { ttl } else { ttl / 5 };
        entries.insert(
            key.to_string(),
            CacheEntry {
                stored_at: Utc::now(),
                ttl: effective_ttl,
                result: result.clone(),
            },
        );

        result
    }
}

impl<T: Clone> Default for FeedCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
