use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::time::Instant;

use crate::error::{AppError, AppResult};
use crate::models::CatalogId;

mod macros;

/// Default lifetime of a cached response (12 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(43_200);

/// Upper bound on the TTL (about 100 years); keeps expiry arithmetic from overflowing
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// How often the sweeper purges expired entries
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq)]
pub enum CacheKey {
    /// Reverse-geocoded location. Coordinates are concatenated as given, not rounded.
    Location { latitude: f64, longitude: f64 },
    TitleLookup(String),
    MovieDetail(CatalogId),
    SearchQuery(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Location {
                latitude,
                longitude,
            } => write!(f, "citystate_{}{}", latitude, longitude),
            CacheKey::TitleLookup(title) => write!(f, "tmdb_id_{}", title.replace(' ', "_")),
            CacheKey::MovieDetail(id) => write!(f, "movie_detail_{}", id),
            CacheKey::SearchQuery(query) => write!(f, "searchquery_{}", query),
        }
    }
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory response cache with a fixed time-to-live
///
/// Cloning is cheap; all clones share the same entries. Expiry is measured on the
/// tokio clock, so tests can pause and advance time.
#[derive(Clone)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

/// Handle for gracefully shutting down the cache sweeper
pub struct CacheSweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheSweeperHandle {
    /// Signals the sweeper task to stop after its current pass.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache sweeper shutdown signal sent");
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Cache {
    /// Creates an empty cache; `ttl` is capped at [`MAX_TTL`]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: ttl.min(MAX_TTL),
        }
    }

    /// Spawns a background task that periodically drops expired entries
    pub fn spawn_sweeper(&self, interval: Duration) -> CacheSweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let cache = self.clone();

        tokio::spawn(async move {
            tracing::info!(interval_secs = interval.as_secs(), "Cache sweeper task started");
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let purged = cache.purge_expired().await;
                        if purged > 0 {
                            tracing::debug!(purged, "Purged expired cache entries");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Cache sweeper task stopped");
                        break;
                    }
                }
            }
        });

        CacheSweeperHandle { shutdown_tx }
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` when the key is absent or its entry has expired. Expired
    /// entries are removed on read.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let key = key.to_string();
        let now = Instant::now();

        let value = {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
                Some(_) => None,
                None => return Ok(None),
            }
        };

        match value {
            Some(value) => {
                let data = serde_json::from_value(value).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => {
                let mut entries = self.entries.write().await;
                if entries.get(&key).is_some_and(|e| e.is_expired(now)) {
                    entries.remove(&key);
                }
                Ok(None)
            }
        }
    }

    /// Stores a value under `key` for the cache's TTL, replacing any previous entry
    pub async fn set<T: serde::Serialize>(&self, key: &CacheKey, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };

        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Removes every expired entry, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
