//! Size- and time-bounded cache of remotely fetched media resources.
//!
//! The cache owns every handle it issues, deduplicates in-flight fetches per
//! path, caches failed fetches as negative entries, and bounds memory with a
//! least-recently-used capacity limit plus idle-TTL pruning.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::domain::entities::ResourceHandle;
use crate::domain::ports::BinaryFetchPort;

/// Default maximum number of cached entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default idle duration after which an entry becomes evictable.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Configuration for the resource cache.
#[derive(Debug, Clone)]
pub struct ResourceCacheConfig {
    /// Maximum number of entries kept in the cache. Negative entries count
    /// against the limit like any other.
    pub max_entries: usize,
    /// Idle duration after which an entry may be pruned.
    pub ttl: Duration,
}

impl Default for ResourceCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: DEFAULT_TTL,
        }
    }
}

/// One cached resolution outcome. A `None` handle records a failed fetch so
/// repeated lookups of a known-bad path stay cheap until the entry expires.
struct CacheEntry {
    handle: Option<ResourceHandle>,
    created_at: Instant,
    last_access: Instant,
}

type Waiters = Vec<oneshot::Sender<Option<ResourceHandle>>>;

/// The three state slices mutated together under one lock: cache entries,
/// per-path in-flight waiter lists, and last error messages.
#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    loading: HashMap<String, Waiters>,
    errors: HashMap<String, String>,
}

/// What a `resolve` call decided to do while holding the state lock.
enum Plan {
    Done(Option<ResourceHandle>),
    Wait(oneshot::Receiver<Option<ResourceHandle>>),
    Fetch,
}

/// Cache of remote media resources keyed by logical path.
///
/// Construct one per application (or per test) and inject it into consumers;
/// all methods take `&self` and the cache is safe to share behind an `Arc`.
/// The lock is never held across a suspension point, so concurrent callers
/// always observe fully formed state.
pub struct ResourceCache {
    state: Mutex<CacheState>,
    fetcher: Arc<dyn BinaryFetchPort>,
    config: ResourceCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResourceCache {
    /// Creates a cache with the given configuration.
    #[must_use]
    pub fn new(fetcher: Arc<dyn BinaryFetchPort>, config: ResourceCacheConfig) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            fetcher,
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a cache with the default configuration.
    #[must_use]
    pub fn with_defaults(fetcher: Arc<dyn BinaryFetchPort>) -> Self {
        Self::new(fetcher, ResourceCacheConfig::default())
    }

    /// Resolves a path to a local handle, fetching on a cache miss.
    ///
    /// Failures are cached: once a fetch for a path has failed, subsequent
    /// calls return `None` without refetching until the entry expires or is
    /// evicted. Concurrent calls for the same path collapse to a single
    /// fetch; late callers observe the first fetch's outcome. Never returns
    /// an error.
    pub async fn resolve(&self, path: &str) -> Option<ResourceHandle> {
        self.prune();

        let plan = {
            let mut state = self.state.lock();
            if let Some(entry) = state.entries.get_mut(path) {
                match entry.handle.clone() {
                    Some(handle) => {
                        entry.last_access = Instant::now();
                        self.hits.fetch_add(1, Ordering::Relaxed);
                        trace!(path = %path, "cache hit");
                        Plan::Done(Some(handle))
                    }
                    None => {
                        self.hits.fetch_add(1, Ordering::Relaxed);
                        trace!(path = %path, "negative cache hit");
                        Plan::Done(None)
                    }
                }
            } else if let Some(waiters) = state.loading.get_mut(path) {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                trace!(path = %path, "joining in-flight fetch");
                Plan::Wait(rx)
            } else {
                state.loading.insert(path.to_owned(), Vec::new());
                state.errors.remove(path);
                self.misses.fetch_add(1, Ordering::Relaxed);
                Plan::Fetch
            }
        };

        match plan {
            Plan::Done(outcome) => outcome,
            // A dropped sender (evict or clear_all mid-flight) reads as a
            // failed resolution.
            Plan::Wait(rx) => rx.await.ok().flatten(),
            Plan::Fetch => self.fetch_and_store(path).await,
        }
    }

    /// Resolves several paths concurrently, returning a complete mapping.
    ///
    /// Duplicates are resolved once. No ordering is guaranteed between the
    /// constituent resolutions. Never fails as a whole; unreachable paths
    /// simply map to `None`.
    pub async fn resolve_many<I, S>(&self, paths: I) -> HashMap<String, Option<ResourceHandle>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if !unique.iter().any(|u| u == path) {
                unique.push(path.to_owned());
            }
        }

        let results = join_all(unique.iter().map(|path| self.resolve(path))).await;
        unique.into_iter().zip(results).collect()
    }

    /// Bumps the last-access time of an entry. No-op if absent.
    pub fn touch(&self, path: &str) {
        let mut state = self.state.lock();
        if let Some(entry) = state.entries.get_mut(path) {
            entry.last_access = Instant::now();
        }
    }

    /// Removes one path from the cache, releasing its handle and dropping
    /// any loading and error state. Safe to call on an absent key.
    pub fn evict(&self, path: &str) {
        let mut state = self.state.lock();
        Self::remove_entry(&mut state, path);
        // Pending waiters wake with a failed resolution.
        state.loading.remove(path);
    }

    /// Releases every handle and resets all cache state. Intended for full
    /// teardown, e.g. at session end.
    pub fn clear_all(&self) {
        let mut state = self.state.lock();
        let released = state
            .entries
            .drain()
            .filter_map(|(_, entry)| entry.handle)
            .filter(ResourceHandle::revoke)
            .count();
        state.loading.clear();
        state.errors.clear();
        debug!(released, "cleared resource cache");
    }

    /// Removes every entry idle for longer than the configured TTL. Runs
    /// implicitly at the start of every `resolve`.
    pub fn prune(&self) {
        let mut state = self.state.lock();
        let now = Instant::now();
        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_access) > self.config.ttl)
            .map(|(path, _)| path.clone())
            .collect();

        if expired.is_empty() {
            return;
        }

        for path in &expired {
            Self::remove_entry(&mut state, path);
        }
        debug!(count = expired.len(), "pruned idle cache entries");
    }

    /// Returns the last fetch error recorded for a path, if any.
    #[must_use]
    pub fn last_error(&self, path: &str) -> Option<String> {
        self.state.lock().errors.get(path).cloned()
    }

    /// Returns true if a fetch for the path is currently in flight.
    #[must_use]
    pub fn is_loading(&self, path: &str) -> bool {
        self.state.lock().loading.contains_key(path)
    }

    /// Returns true if the cache holds an entry (positive or negative) for
    /// the path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.state.lock().entries.contains_key(path)
    }

    /// Returns the time since the entry for a path was first created.
    #[must_use]
    pub fn age(&self, path: &str) -> Option<Duration> {
        let state = self.state.lock();
        state
            .entries
            .get(path)
            .map(|entry| Instant::now().duration_since(entry.created_at))
    }

    /// Returns the current number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns true if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Performs the single fetch for a path and publishes the outcome to the
    /// cache and to every waiter that attached while it was in flight.
    async fn fetch_and_store(&self, path: &str) -> Option<ResourceHandle> {
        let outcome = match self.fetcher.fetch_binary(path).await {
            Ok(data) if data.is_empty() => Err(format!("empty payload for {path}")),
            Ok(data) => Ok(ResourceHandle::new(data)),
            Err(e) => Err(e.to_string()),
        };

        let mut state = self.state.lock();
        let now = Instant::now();

        let handle = match outcome {
            Ok(handle) => {
                debug!(path = %path, bytes = handle.len(), "fetched and cached resource");
                Some(handle)
            }
            Err(message) => {
                warn!(path = %path, error = %message, "resource fetch failed");
                state.errors.insert(path.to_owned(), message);
                None
            }
        };

        let entry = CacheEntry {
            handle: handle.clone(),
            created_at: now,
            last_access: now,
        };
        // An entry can already exist if the key was cleared and refetched
        // while this fetch was in flight; release the stale handle.
        if let Some(old) = state.entries.insert(path.to_owned(), entry) {
            if let Some(old_handle) = old.handle {
                old_handle.revoke();
            }
        }

        if handle.is_some() {
            self.enforce_capacity(&mut state);
        }

        if let Some(waiters) = state.loading.remove(path) {
            for waiter in waiters {
                let _ = waiter.send(handle.clone());
            }
        }

        handle
    }

    /// Evicts the oldest-accessed entries beyond the capacity limit.
    fn enforce_capacity(&self, state: &mut CacheState) {
        if state.entries.len() <= self.config.max_entries {
            return;
        }

        let mut by_age: Vec<(String, Instant)> = state
            .entries
            .iter()
            .map(|(path, entry)| (path.clone(), entry.last_access))
            .collect();
        by_age.sort_by_key(|(_, last_access)| *last_access);

        let excess = state.entries.len() - self.config.max_entries;
        for (path, _) in by_age.into_iter().take(excess) {
            Self::remove_entry(state, &path);
            debug!(path = %path, "evicted least-recently-used entry");
        }
    }

    fn remove_entry(state: &mut CacheState, path: &str) {
        if let Some(entry) = state.entries.remove(path) {
            if let Some(handle) = entry.handle {
                handle.revoke();
            }
        }
        state.errors.remove(path);
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of lookups answered from the cache, negative entries included.
    pub hits: u64,
    /// Number of lookups that started a fetch.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached entries.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} entries, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}
