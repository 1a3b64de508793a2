//! In-memory object store.
//!
//! Non-persistent store using DashMap for concurrent access. Used for tests
//! and local development without bucket credentials.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use super::{ObjectStore, StoreError};

#[derive(Debug, Clone)]
struct MemoryObject {
    body: Bytes,
    content_type: String,
}

/// In-memory object store.
///
/// Counts every `get` and `put` so tests can assert that a rejected request
/// never reached storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<String, MemoryObject>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `put` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw stored body, bypassing the counters.
    pub fn peek(&self, key: &str) -> Option<Bytes> {
        self.objects.get(key).map(|entry| entry.body.clone())
    }

    /// Content type recorded for `key`.
    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects.get(key).map(|entry| entry.content_type.clone())
    }

    /// Seeds an object without touching the counters.
    pub fn insert_raw(&self, key: &str, body: impl Into<Bytes>) {
        self.objects.insert(
            key.to_string(),
            MemoryObject {
                body: body.into(),
                content_type: "application/json".to_string(),
            },
        );
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.peek(key))
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.objects.insert(
            key.to_string(),
            MemoryObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
