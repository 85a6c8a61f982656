// Fetch-result caching, modeled as an explicit collaborator the pipeline
// calls through rather than behavior baked into the adapters.
//
// Keys are (game, time bucket) where `bucket = unix_now / ttl_secs`, so an
// entry naturally expires when the wall clock crosses into the next bucket.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, info};

use crate::config::GameId;
use crate::fetch::{DrawSource, FetchError};
use crate::model::DrawHistory;

// ---------------------------------------------------------------------------
// HistoryCache trait
// ---------------------------------------------------------------------------

/// Capability: remember a fetched history for the duration of a time
/// bucket. Implementations must be safe to share across invocations.
pub trait HistoryCache: Send + Sync {
    fn get(&self, game: GameId, bucket: u64) -> Option<DrawHistory>;
    fn put(&self, game: GameId, bucket: u64, history: DrawHistory);
}

/// Cache that never stores anything; every fetch goes to the network.
pub struct NoopCache;

impl HistoryCache for NoopCache {
    fn get(&self, _game: GameId, _bucket: u64) -> Option<DrawHistory> {
        None
    }

    fn put(&self, _game: GameId, _bucket: u64, _history: DrawHistory) {}
}

/// In-process cache keyed by (game, bucket). Stale buckets for a game are
/// dropped on insert; the map never holds more than one entry per game.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<GameId, (u64, DrawHistory)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryCache for MemoryCache {
    fn get(&self, game: GameId, bucket: u64) -> Option<DrawHistory> {
        let entries = self.entries.lock().ok()?;
        match entries.get(&game) {
            Some((stored_bucket, history)) if *stored_bucket == bucket => Some(history.clone()),
            _ => None,
        }
    }

    fn put(&self, game: GameId, bucket: u64, history: DrawHistory) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(game, (bucket, history));
        }
    }
}

// ---------------------------------------------------------------------------
// Cached fetch
// ---------------------------------------------------------------------------

/// Current bucket index for the given TTL.
pub fn current_bucket(ttl_secs: u64) -> u64 {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    now / ttl_secs.max(1)
}

/// Fetch a history through the cache: serve the current bucket's entry if
/// present, otherwise fetch from the source and store the result. Fetch
/// errors are never cached.
pub async fn fetch_cached(
    source: &dyn DrawSource,
    cache: &dyn HistoryCache,
    ttl_secs: u64,
) -> Result<DrawHistory, FetchError> {
    let game = source.game();
    let bucket = current_bucket(ttl_secs);

    if let Some(history) = cache.get(game, bucket) {
        debug!(%game, bucket, draws = history.len(), "cache hit");
        return Ok(history);
    }

    let history = source.fetch_history().await?;
    info!(%game, draws = history.len(), "fetched draw history");
    cache.put(game, bucket, history.clone());
    Ok(history)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
