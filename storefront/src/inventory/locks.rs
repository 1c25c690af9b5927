//! Per-key async locks
//!
//! Reservation operations on the same plant must not interleave (two rapid
//! clicks, two panels editing the same order). Each key maps to one shared
//! async mutex; entries are created on first use and live for the store's
//! lifetime. The keyspace is the catalog, which is small.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// The shared lock for `key`, created on first use
    pub fn get(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
