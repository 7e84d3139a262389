//! In-memory [`QueryCache`].
//!
//! Entries are addressed by [`CacheKey::hash_key`]. Each entry keeps the last
//! successful payload, the last error and an invalidation flag:
//!
//! - a valid entry with data is returned without calling the producer
//! - otherwise the producer runs; success stores the data and clears the error,
//!   failure records the error and keeps the previous data
//! - an invalidation that lands while the producer runs leaves the entry stale,
//!   even though the new data is stored
//!
//! Concurrent fetches of the same key are not merged: each one runs its producer.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::{CacheKey, Payload, Producer, QueryCache, Result};

/// Observable state of one cache entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Last successful payload.
    pub data: Option<Payload>,
    /// Message of the last failure, cleared by the next success.
    pub error: Option<String>,
    /// HTTP status of the last failure, if it was a failed response.
    pub error_status: Option<u16>,
    /// Set by invalidation, cleared by the next successful fetch started after it.
    pub invalidated: bool,
    /// Number of producer runs.
    pub fetch_count: usize,
}

impl QueryState {
    /// Returns `true` when the last producer run failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn is_fresh(&self) -> bool {
        !self.invalidated && self.error.is_none() && self.data.is_some()
    }
}

#[derive(Debug)]
struct Entry {
    key: CacheKey,
    state: QueryState,
    /// Bumped by every invalidation that matches this entry.
    generation: u64,
}

impl Entry {
    fn new(key: CacheKey) -> Self {
        Self {
            key,
            state: QueryState::default(),
            generation: 0,
        }
    }
}

enum Lookup {
    Fresh(Payload),
    /// Needs a fetch, started at this generation.
    Stale(u64),
}

/// Cache holding query states in memory.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// State of the entry at `key`.
    #[must_use]
    pub fn state(&self, key: &CacheKey) -> Option<QueryState> {
        self.entries()
            .get(&key.hash_key())
            .map(|entry| entry.state.clone())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` when the cache holds no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// The entry is created when missing so that invalidations issued during the
    /// fetch have something to mark.
    fn lookup(&self, key: &CacheKey, hash: &str) -> Lookup {
        let mut entries = self.entries();
        let entry = entries
            .entry(hash.to_string())
            .or_insert_with(|| Entry::new(key.clone()));

        match &entry.state.data {
            Some(data) if entry.state.is_fresh() => Lookup::Fresh(data.clone()),
            _ => Lookup::Stale(entry.generation),
        }
    }

    fn record(&self, key: CacheKey, hash: String, started_at: u64, result: &Result<Payload>) {
        let mut entries = self.entries();
        let entry = entries.entry(hash).or_insert_with(|| Entry::new(key));
        let invalidated_meanwhile = entry.generation != started_at;

        let state = &mut entry.state;
        state.fetch_count += 1;
        match result {
            Ok(payload) => {
                state.data = Some(payload.clone());
                state.error = None;
                state.error_status = None;
                state.invalidated = invalidated_meanwhile;
            }
            Err(err) => {
                state.error = Some(err.to_string());
                state.error_status = err.status();
            }
        }
    }
}

impl QueryCache for MemoryCache {
    async fn fetch<P: Producer>(&self, key: CacheKey, producer: &P) -> Result<Payload> {
        let hash = key.hash_key();

        let started_at = match self.lookup(&key, &hash) {
            Lookup::Fresh(data) => {
                debug!(key = %hash, "query cache hit");
                return Ok(data);
            }
            Lookup::Stale(generation) => generation,
        };

        debug!(key = %hash, "query cache fetch");
        let result = producer.produce().await;
        if let Err(err) = &result {
            debug!(key = %hash, error = %err, "query failed");
        }
        self.record(key, hash, started_at, &result);
        result
    }

    fn invalidate(&self, filter: &CacheKey) {
        let mut count = 0_usize;
        for entry in self.entries().values_mut() {
            if entry.key.matches(filter) {
                entry.state.invalidated = true;
                entry.generation += 1;
                count += 1;
            }
        }
        debug!(filter = %filter.hash_key(), count, "query cache invalidated");
    }

    fn get_data(&self, key: &CacheKey) -> Option<Payload> {
        self.entries()
            .get(&key.hash_key())
            .and_then(|entry| entry.state.data.clone())
    }

    fn set_data(&self, key: CacheKey, data: Payload) {
        let hash = key.hash_key();
        debug!(key = %hash, "query data set");

        let mut entries = self.entries();
        let entry = entries.entry(hash).or_insert_with(|| Entry::new(key));
        entry.state.data = Some(data);
        entry.state.error = None;
        entry.state.error_status = None;
        entry.state.invalidated = false;
    }
}
