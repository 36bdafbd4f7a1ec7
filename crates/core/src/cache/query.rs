//! Read-through request cache with stale-while-revalidate semantics.
//!
//! - A fresh entry is returned without calling the loader.
//! - A stale entry is returned immediately and refreshed in the background;
//!   a failed refresh keeps the stale value.
//! - Concurrent misses for one key share a single load.
//! - Transient failures are retried; the final error reaches every waiter
//!   and is never cached.
//!
//! Loads run as spawned tasks, so a load whose callers have all gone away
//! still completes and populates the cache. The map lock is never held
//! across an await point.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::key::{CacheKey, ResourceKind};
use crate::Error;

type LoadFuture<V> = Shared<BoxFuture<'static, Result<V, Error>>>;

/// Per-request cache behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a loaded value counts as fresh.
    pub ttl: Duration,
    /// Additional attempts after a transient failure.
    pub retries: u32,
    /// Base delay before a retry; attempt `n` waits `n * retry_delay`.
    pub retry_delay: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(300), retries: 1, retry_delay: Duration::from_millis(250) }
    }
}

/// Observable lifecycle state of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Fresh,
    Stale,
    Fetching,
    Failed,
}

struct InFlight<V> {
    id: u64,
    future: LoadFuture<V>,
}

struct Slot<V> {
    value: Option<V>,
    fetched_at: Instant,
    ttl: Duration,
    failed: bool,
    load: Option<InFlight<V>>,
    last_used: u64,
}

impl<V> Slot<V> {
    fn empty(tick: u64) -> Self {
        Self { value: None, fetched_at: Instant::now(), ttl: Duration::ZERO, failed: false, load: None, last_used: tick }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.value.is_some() && now.duration_since(self.fetched_at) < self.ttl
    }

    fn state(&self, now: Instant) -> Option<EntryState> {
        if self.load.is_some() {
            Some(EntryState::Fetching)
        } else if self.value.is_some() {
            Some(if self.is_fresh(now) { EntryState::Fresh } else { EntryState::Stale })
        } else if self.failed {
            Some(EntryState::Failed)
        } else {
            None
        }
    }
}

struct Inner<V> {
    slots: HashMap<CacheKey, Slot<V>>,
    clock: u64,
    next_load: u64,
}

impl<V: Clone> Inner<V> {
    fn complete(&mut self, key: &CacheKey, id: u64, result: &Result<V, Error>, ttl: Duration, capacity: usize) {
        self.clock += 1;
        let tick = self.clock;

        let Some(slot) = self.slots.get_mut(key) else {
            tracing::debug!(key = %key, "entry invalidated during load; dropping result");
            return;
        };
        if slot.load.as_ref().map(|load| load.id) != Some(id) {
            tracing::debug!(key = %key, "load superseded; dropping result");
            return;
        }
        slot.load = None;

        match result {
            Ok(value) => {
                slot.value = Some(value.clone());
                slot.fetched_at = Instant::now();
                slot.ttl = ttl;
                slot.failed = false;
                slot.last_used = tick;
            }
            Err(err) => {
                slot.failed = slot.value.is_none();
                tracing::warn!(key = %key, error = %err, keeping_stale = !slot.failed, "load failed");
            }
        }
        self.evict_to(capacity);
    }

    /// Drop least recently used idle entries until at most `capacity` remain.
    fn evict_to(&mut self, capacity: usize) {
        while self.slots.len() > capacity {
            let victim = self
                .slots
                .iter()
                .filter(|(_, slot)| slot.load.is_none())
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(key, _)| key.clone());

            match victim {
                Some(key) => {
                    self.slots.remove(&key);
                    tracing::debug!(key = %key, "evicted least recently used entry");
                }
                None => break,
            }
        }
    }
}

enum Lookup<V> {
    Hit(V),
    Stale { value: V, refresh: bool },
    Join(LoadFuture<V>),
    Miss,
}

fn lock<V>(inner: &Mutex<Inner<V>>) -> MutexGuard<'_, Inner<V>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared, de-duplicating request cache for values of type `V`.
///
/// Cloning is cheap; clones share the same entries.
pub struct QueryCache<V> {
    inner: Arc<Mutex<Inner<V>>>,
    capacity: usize,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner), capacity: self.capacity }
    }
}

impl<V> fmt::Debug for QueryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &lock(&self.inner).slots.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache holding at most `capacity` entries (minimum one).
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { slots: HashMap::new(), clock: 0, next_load: 0 })),
            capacity: capacity.max(1),
        }
    }

    /// Return the value for `key`, loading it with `loader` when needed.
    ///
    /// # Errors
    ///
    /// Returns the loader's error once retries are exhausted. Stale values
    /// are returned even when their background refresh later fails.
    pub async fn get<F, Fut>(&self, key: CacheKey, options: QueryOptions, loader: F) -> Result<V, Error>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, Error>> + Send + 'static,
    {
        let pending = {
            let mut inner = lock(&self.inner);
            inner.clock += 1;
            let tick = inner.clock;
            let now = Instant::now();

            let lookup = match inner.slots.get_mut(&key) {
                Some(slot) => {
                    slot.last_used = tick;
                    match (&slot.value, &slot.load) {
                        (Some(value), _) if slot.is_fresh(now) => Lookup::Hit(value.clone()),
                        (Some(value), load) => Lookup::Stale { value: value.clone(), refresh: load.is_none() },
                        (None, Some(load)) => Lookup::Join(load.future.clone()),
                        (None, None) => Lookup::Miss,
                    }
                }
                None => Lookup::Miss,
            };

            match lookup {
                Lookup::Hit(value) => {
                    tracing::debug!(key = %key, "cache hit");
                    return Ok(value);
                }
                Lookup::Stale { value, refresh } => {
                    tracing::debug!(key = %key, refresh, "serving stale entry");
                    if refresh {
                        let _ = self.begin_load(&mut inner, key, options, loader, tick);
                    }
                    return Ok(value);
                }
                Lookup::Join(future) => {
                    tracing::debug!(key = %key, "joining in-flight load");
                    future
                }
                Lookup::Miss => {
                    tracing::debug!(key = %key, "cache miss");
                    self.begin_load(&mut inner, key, options, loader, tick)
                }
            }
        };

        pending.await
    }

    fn begin_load<F, Fut>(
        &self, inner: &mut Inner<V>, key: CacheKey, options: QueryOptions, loader: F, tick: u64,
    ) -> LoadFuture<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, Error>> + Send + 'static,
    {
        inner.next_load += 1;
        let id = inner.next_load;
        let cache = Arc::downgrade(&self.inner);
        let capacity = self.capacity;
        let load_key = key.clone();

        let future = async move {
            let result = load_with_retry(&load_key, &options, &loader).await;
            if let Some(cache) = cache.upgrade() {
                lock(&cache).complete(&load_key, id, &result, options.ttl, capacity);
            }
            result
        }
        .boxed()
        .shared();

        let slot = inner.slots.entry(key).or_insert_with(|| Slot::empty(tick));
        slot.load = Some(InFlight { id, future: future.clone() });
        slot.failed = false;

        tokio::spawn(future.clone());
        future
    }

    /// Current lifecycle state of `key`, if an entry exists.
    pub fn entry_state(&self, key: &CacheKey) -> Option<EntryState> {
        let now = Instant::now();
        lock(&self.inner).slots.get(key).and_then(|slot| slot.state(now))
    }

    /// Cached value for `key` regardless of freshness, without loading.
    pub fn peek(&self, key: &CacheKey) -> Option<V> {
        lock(&self.inner).slots.get(key).and_then(|slot| slot.value.clone())
    }

    /// Remove `key` unconditionally. An in-flight load for it will not write back.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let removed = lock(&self.inner).slots.remove(key).is_some();
        if removed {
            tracing::debug!(key = %key, "invalidated entry");
        }
        removed
    }

    /// Remove every entry of the given kind; returns how many were removed.
    pub fn invalidate_kind(&self, kind: ResourceKind) -> usize {
        let mut inner = lock(&self.inner);
        let before = inner.slots.len();
        inner.slots.retain(|key, _| key.kind() != kind);
        before - inner.slots.len()
    }

    /// Remove every entry; returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut inner = lock(&self.inner);
        let removed = inner.slots.len();
        inner.slots.clear();
        removed
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

async fn load_with_retry<V, F, Fut>(key: &CacheKey, options: &QueryOptions, loader: &F) -> Result<V, Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<V, Error>>,
{
    let mut attempt: u32 = 0;
    loop {
        match loader().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < options.retries => {
                attempt += 1;
                tracing::debug!(key = %key, attempt, error = %err, "transient failure; retrying");
                tokio::time::sleep(options.retry_delay.saturating_mul(attempt)).await;
            }
            Err(err) => return Err(err),
        }
    }
}
