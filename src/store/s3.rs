//! S3-compatible object store backed by an opendal operator.

use async_trait::async_trait;
use bytes::Bytes;
use opendal::{services::S3, ErrorKind, Operator};

use super::{ObjectStore, StoreError};
use crate::config::StorageConfig;

/// Object store talking to an S3-compatible bucket (AWS, R2, MinIO...).
#[derive(Clone)]
pub struct S3Store {
    op: Operator,
}

impl S3Store {
    /// Build the store from configuration.
    ///
    /// Fails with [`StoreError::Unconfigured`] when a required credential is absent.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StoreError> {
        let missing = config.missing();
        if !missing.is_empty() {
            return Err(StoreError::Unconfigured(missing));
        }

        let mut options: Vec<(String, String)> = vec![("region".into(), config.region.clone())];
        let fields = [
            ("endpoint", &config.endpoint),
            ("bucket", &config.bucket),
            ("access_key_id", &config.access_key_id),
            ("secret_access_key", &config.secret_access_key),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                options.push((name.to_string(), value.clone()));
            }
        }

        let op = Operator::from_iter::<S3>(options.into_iter())
            .map_err(|e| StoreError::Backend {
                key: String::new(),
                message: e.to_string(),
            })?
            .finish();

        Ok(Self { op })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        match self.op.read(key).await {
            Ok(buffer) => Ok(Some(buffer.to_bytes())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Backend {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.op
            .write_with(key, body)
            .content_type(content_type)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Backend {
                key: key.to_string(),
                message: e.to_string(),
            })
    }
}
