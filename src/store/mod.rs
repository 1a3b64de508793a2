//! Object store module.
//!
//! The object store is the source of truth for all site metadata. Handlers
//! reach it through the [`ObjectStore`] trait so a fake can be injected in tests.

mod memory;
mod repository;
mod s3;

pub use memory::*;
pub use repository::*;
pub use s3::*;

use async_trait::async_trait;
use bytes::Bytes;

/// Errors raised by an object store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object store is not configured (missing {})", .0.join(", "))]
    Unconfigured(Vec<&'static str>),

    #[error("backend error on {key}: {message}")]
    Backend { key: String, message: String },

    #[error("stored document {key} is not valid JSON: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize document for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Minimal key-value object store.
///
/// Implementations must be thread-safe; every handler invocation shares one
/// instance and no coordination happens between concurrent writers.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Fetches the object at `key`.
    ///
    /// Returns `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Overwrites the object at `key` unconditionally.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StoreError>;
}

/// Stand-in used when credentials are absent; every operation fails.
#[derive(Debug, Clone)]
pub struct UnconfiguredStore {
    missing: Vec<&'static str>,
}

impl UnconfiguredStore {
    pub fn new(missing: Vec<&'static str>) -> Self {
        Self { missing }
    }
}

#[async_trait]
impl ObjectStore for UnconfiguredStore {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, StoreError> {
        Err(StoreError::Unconfigured(self.missing.clone()))
    }

    async fn put(&self, _key: &str, _body: Bytes, _content_type: &str) -> Result<(), StoreError> {
        Err(StoreError::Unconfigured(self.missing.clone()))
    }
}
