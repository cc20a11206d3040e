//! In-process cache of finished article results.
//!
//! Keys are the requested URL strings, compared exactly: no normalization of
//! casing, trailing slashes or query order. The cache is optionally bounded,
//! evicting the least recently used entry once full.
//!
//! [`ResultCache::get_or_try_insert`] serialises computations per key, so
//! concurrent requests for the same uncached URL wait on one computation
//! instead of racing to fill the entry.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::summary::ArticleResult;

/// Hit/miss counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

struct Entry {
    result: ArticleResult,
    last_used: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<String, Entry>,
    clock: u64,
}

impl Entries {
    fn touch(&mut self, url: &str) -> Option<ArticleResult> {
        self.clock += 1;
        let clock = self.clock;
        self.map.get_mut(url).map(|entry| {
            entry.last_used = clock;
            entry.result.clone()
        })
    }

    fn insert(&mut self, url: String, result: ArticleResult, capacity: Option<NonZeroUsize>) {
        self.clock += 1;
        if let Some(capacity) = capacity {
            if !self.map.contains_key(&url) && self.map.len() >= capacity.get() {
                self.evict_oldest();
            }
        }
        self.map.insert(
            url,
            Entry {
                result,
                last_used: self.clock,
            },
        );
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(url, _)| url.clone());
        if let Some(url) = oldest {
            debug!(url = %url, "evicting cached article");
            self.map.remove(&url);
        }
    }
}

/// Per-key locks of computations currently running or waited on. Never held
/// across an await.
type InFlightMap = std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>;

/// One caller's turn on a key. Dropping it, on completion or cancellation,
/// releases the turn and removes the key once nobody else holds its lock.
struct InFlight<'a> {
    map: &'a InFlightMap,
    url: &'a str,
    turn: Option<OwnedMutexGuard<()>>,
}

impl<'a> InFlight<'a> {
    async fn enter(map: &'a InFlightMap, url: &'a str) -> InFlight<'a> {
        let key_lock = {
            let mut map = map.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(url.to_string()).or_default())
        };
        let mut in_flight = InFlight {
            map,
            url,
            turn: None,
        };
        in_flight.turn = Some(key_lock.lock_owned().await);
        in_flight
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        // release our handle on the key lock before counting the others
        self.turn.take();
        let unused = map
            .get(self.url)
            .is_some_and(|key_lock| Arc::strong_count(key_lock) == 1);
        if unused {
            map.remove(self.url);
        }
    }
}

/// URL-keyed cache of [`ArticleResult`]s.
pub struct ResultCache {
    capacity: Option<NonZeroUsize>,
    entries: Mutex<Entries>,
    in_flight: InFlightMap,
    stats: CacheStats,
}

impl ResultCache {
    /// Cache holding at most `capacity` results.
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::with_capacity(Some(capacity))
    }

    /// Cache that never evicts.
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// A capacity of 0 means unbounded.
    pub fn from_capacity(capacity: usize) -> Self {
        Self::with_capacity(NonZeroUsize::new(capacity))
    }

    fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
            in_flight: std::sync::Mutex::new(HashMap::new()),
            stats: CacheStats::default(),
        }
    }

    pub async fn get(&self, url: &str) -> Option<ArticleResult> {
        let hit = self.entries.lock().await.touch(url);
        self.record(hit.is_some());
        hit
    }

    pub async fn put(&self, url: impl Into<String>, result: ArticleResult) {
        self.entries
            .lock()
            .await
            .insert(url.into(), result, self.capacity);
    }

    /// Return the cached result for `url`, or run `compute` to produce it.
    ///
    /// At most one `compute` per key runs at a time; callers arriving while it
    /// runs wait and then read its result. Errors are returned to the caller
    /// that computed them and are not cached.
    pub async fn get_or_try_insert<F, Fut, E>(&self, url: &str, compute: F) -> Result<ArticleResult, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ArticleResult, E>>,
    {
        if let Some(hit) = self.get(url).await {
            info!(url, "returning cached summary");
            return Ok(hit);
        }

        let _turn = InFlight::enter(&self.in_flight, url).await;

        if let Some(hit) = self.entries.lock().await.touch(url) {
            self.record(true);
            return Ok(hit);
        }

        let result = compute().await?;
        self.put(url, result.clone()).await;
        Ok(result)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every cached result.
    pub async fn clear(&self) {
        self.entries.lock().await.map.clear();
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.stats.hits } else { &self.stats.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
