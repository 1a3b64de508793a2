//! Request and response bodies of the metadata endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ContentType;

/// Query string of the read endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataQuery {
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
}

/// Body of a successful read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub data: Value,
}

/// Request body for the write endpoint.
///
/// Both fields are optional at the serde level so that missing values are
/// reported through the error envelope rather than a rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveMetadataRequest {
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Confirmation returned after a write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadataResponse {
    pub message: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl SaveMetadataResponse {
    pub fn new(content_type: ContentType, data: &Value) -> Self {
        Self {
            message: format!("{} metadata saved", content_type),
            content_type,
            count: data.as_array().map(Vec::len),
        }
    }
}

/// Query string of the image proxy endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageProxyQuery {
    #[serde(default)]
    pub url: Option<String>,
}
