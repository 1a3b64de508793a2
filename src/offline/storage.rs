//! Named cache generations.

use std::sync::Arc;

use dashmap::DashMap;

use super::http::{CacheKey, FetchResponse};

/// One cache generation: an immutable key to response map where a put
/// replaces any previous entry for the key.
#[derive(Debug, Default)]
pub struct Cache {
    entries: DashMap<CacheKey, FetchResponse>,
}

impl Cache {
    pub fn put(&self, key: CacheKey, response: FetchResponse) {
        self.entries.insert(key, response);
    }

    pub fn lookup(&self, key: &CacheKey) -> Option<FetchResponse> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All cache generations visible to the controller, keyed by name.
///
/// Outlives any single controller version so that a newly activated version
/// can sweep what its predecessors left behind.
#[derive(Debug, Default)]
pub struct CacheStorage {
    generations: DashMap<String, Arc<Cache>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named generation, creating it empty if needed.
    pub fn open(&self, name: &str) -> Arc<Cache> {
        self.generations
            .entry(name.to_string())
            .or_default()
            .value()
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Cache>> {
        self.generations.get(name).map(|entry| entry.value().clone())
    }

    pub fn has(&self, name: &str) -> bool {
        self.generations.contains_key(name)
    }

    /// Generation names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .generations
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Drops a generation and every entry in it.
    pub fn delete(&self, name: &str) -> bool {
        self.generations.remove(name).is_some()
    }
}
