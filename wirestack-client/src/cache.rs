//! Query result cache with a staleness window
//!
//! Entries are keyed by procedure name and canonical JSON input. An entry
//! younger than `stale_time` is fresh and served without a request; an
//! older one is left in place until a refetch overwrites it.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: String,
    input: String,
}

impl CacheKey {
    fn new(path: &str, input: &Value) -> Self {
        Self {
            path: path.to_string(),
            input: input.to_string(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    value: Value,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct QueryCache {
    stale_time: Duration,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Cached value for `path`/`input` if it is still fresh
    pub fn get_fresh(&self, path: &str, input: &Value) -> Option<Value> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&CacheKey::new(path, input))
            .filter(|entry| entry.fetched_at.elapsed() < self.stale_time)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, path: &str, input: &Value, value: Value) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            CacheKey::new(path, input),
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop every entry for procedure `path`
    pub fn invalidate(&self, path: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|key, _| key.path != path);
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
