//! Metadata repository on top of the object store.
//!
//! One JSON document per content type; the content type enum is the only index.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use super::{ObjectStore, StoreError};
use crate::models::ContentType;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Repository for metadata documents.
#[derive(Clone)]
pub struct MetadataRepository {
    store: Arc<dyn ObjectStore>,
}

impl MetadataRepository {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Load the document for `content_type`.
    ///
    /// A document that was never written reads as an empty list.
    pub async fn load(&self, content_type: ContentType) -> Result<Value, StoreError> {
        let key = content_type.object_key();

        let Some(body) = self.store.get(&key).await? else {
            tracing::debug!(%key, "metadata document absent, returning empty list");
            return Ok(Value::Array(Vec::new()));
        };

        serde_json::from_slice(&body).map_err(|source| StoreError::Malformed { key, source })
    }

    /// Overwrite the document for `content_type`.
    ///
    /// Last write wins: there is no version check, so concurrent writers to the
    /// same type can silently lose updates.
    pub async fn save(&self, content_type: ContentType, data: &Value) -> Result<(), StoreError> {
        let key = content_type.object_key();
        let body = serde_json::to_vec_pretty(data).map_err(|source| StoreError::Serialize {
            key: key.clone(),
            source,
        })?;

        self.store
            .put(&key, Bytes::from(body), JSON_CONTENT_TYPE)
            .await?;

        tracing::info!(%key, "metadata document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn repo_with_store() -> (MetadataRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (MetadataRepository::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_load_absent_is_empty_list() {
        let (repo, store) = repo_with_store();

        let value = repo.load(ContentType::Faqs).await.unwrap();

        assert_eq!(value, json!([]));
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let (repo, store) = repo_with_store();
        let payload = json!([{ "id": 1, "title": "Easter Vigil" }, { "id": 2 }]);

        repo.save(ContentType::Albums, &payload).await.unwrap();
        let loaded = repo.load(ContentType::Albums).await.unwrap();

        assert_eq!(loaded, payload);
        assert_eq!(
            store.content_type_of("metadata/albums.json").as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json() {
        let (repo, store) = repo_with_store();

        repo.save(ContentType::Bulletins, &json!([{ "id": 7 }]))
            .await
            .unwrap();

        let raw = store.peek("metadata/bulletins.json").unwrap();
        let text = std::str::from_utf8(&raw).unwrap();
        assert!(text.contains('\n'), "expected indented output: {text}");
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_value() {
        let (repo, _store) = repo_with_store();

        repo.save(ContentType::Albums, &json!([1, 2, 3])).await.unwrap();
        repo.save(ContentType::Albums, &json!([4])).await.unwrap();

        assert_eq!(repo.load(ContentType::Albums).await.unwrap(), json!([4]));
    }

    #[tokio::test]
    async fn test_load_malformed_document_fails() {
        let (repo, store) = repo_with_store();
        store.insert_raw("metadata/notices.json", "{not json");

        let err = repo.load(ContentType::Notices).await.unwrap_err();

        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
