//! Metadata API endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, Request, State,
    },
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    ContentType, MetadataDocument, MetadataQuery, SaveMetadataRequest, SaveMetadataResponse,
};
use crate::AppState;

/// GET /api/metadata?type=<type> - Read one metadata document.
pub async fn get_metadata(
    State(state): State<AppState>,
    query: Result<Query<MetadataQuery>, QueryRejection>,
) -> Response {
    let mut response = match load_metadata(&state, query).await {
        Ok(document) => Json(document).into_response(),
        Err(e) => e.into_response(),
    };

    // Mobile browsers hold on to stale metadata unless told otherwise.
    apply_no_cache(response.headers_mut());
    response
}

async fn load_metadata(
    state: &AppState,
    query: Result<Query<MetadataQuery>, QueryRejection>,
) -> Result<MetadataDocument, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let content_type = parse_content_type(query.content_type.as_deref())?;

    let data = state.metadata.load(content_type).await?;
    Ok(MetadataDocument { data })
}

/// Largest metadata document accepted by the write endpoint.
pub const MAX_METADATA_BYTES: usize = 8 * 1024 * 1024;

/// Fail writes fast when the object store credentials are incomplete.
///
/// Runs outside the PSK check so a misconfigured server reports itself
/// before it asks callers for a key.
pub async fn require_storage_config(
    config: Arc<Config>,
    request: Request,
    next: Next,
) -> Response {
    let missing = config.storage.missing();
    if missing.is_empty() {
        return next.run(request).await;
    }

    tracing::error!("Rejecting metadata write, missing configuration: {:?}", missing);
    AppError::Configuration(missing).into_response()
}

/// POST /api/metadata - Overwrite one writable metadata document.
pub async fn save_metadata(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SaveMetadataResponse>, AppError> {
    let body = body.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(format!(
            "Metadata document exceeds {} bytes",
            MAX_METADATA_BYTES
        )),
        _ => AppError::BadRequest(e.body_text()),
    })?;

    let request: SaveMetadataRequest = serde_json::from_slice(&body)?;

    let content_type = parse_content_type(request.content_type.as_deref())?;
    if !content_type.is_writable() {
        return Err(AppError::Validation(format!(
            "Content type '{}' is not writable",
            content_type
        )));
    }

    let Some(data) = request.data else {
        return Err(AppError::Validation("Field 'data' is required".to_string()));
    };

    state.metadata.save(content_type, &data).await?;

    Ok(Json(SaveMetadataResponse::new(content_type, &data)))
}

/// Validate a raw content type selector.
fn parse_content_type(raw: Option<&str>) -> Result<ContentType, AppError> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Content type is required".to_string()))?;

    raw.parse()
        .map_err(|_| AppError::Validation(format!("Invalid content type: {}", raw)))
}

/// Mark a response as never cacheable by clients or intermediaries.
pub fn apply_no_cache(headers: &mut HeaderMap) {
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(
        HeaderName::from_static("surrogate-control"),
        HeaderValue::from_static("no-store"),
    );
}
