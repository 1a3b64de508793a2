//! Image proxy endpoint.
//!
//! Fetches externally hosted images server-side so the browser never makes a
//! cross-origin request that the origin would refuse.

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::errors::AppError;
use crate::models::ImageProxyQuery;
use crate::AppState;

/// Browser-like identification sent to image origins.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

/// Content type used when the origin does not send one.
pub const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

/// Build the HTTP client used for proxied fetches.
///
/// Referer headers are never sent, including on redirects.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .referer(false)
        .build()
}

/// GET /api/image-proxy?url=<url> - Stream an external image back to the caller.
pub async fn proxy_image(
    State(state): State<AppState>,
    query: Result<Query<ImageProxyQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let target = parse_image_url(query.url.as_deref())?;

    tracing::debug!(url = %target, "proxying image");

    let upstream = state
        .http
        .get(target.clone())
        .header(header::ACCEPT, IMAGE_ACCEPT)
        .send()
        .await?;

    let status = upstream.status();
    if !status.is_success() {
        tracing::warn!(url = %target, %status, "image origin returned an error status");
        return Err(AppError::Upstream {
            status: relay_status(status),
            message: format!(
                "Failed to fetch image: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ),
        });
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_IMAGE_TYPE));

    let body = Body::from_stream(upstream.bytes_stream());

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE_CACHE)),
        ],
        body,
    )
        .into_response())
}

/// Accept only absolute http(s) URLs.
pub fn parse_image_url(raw: Option<&str>) -> Result<Url, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Query parameter 'url' is required".to_string()))?;

    let url = Url::parse(raw)
        .map_err(|e| AppError::Validation(format!("Invalid image URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Validation(format!(
            "Unsupported URL scheme '{}', expected http or https",
            other
        ))),
    }
}

/// Informational and redirect codes cannot be relayed as an error response.
fn relay_status(status: StatusCode) -> StatusCode {
    if status.is_client_error() || status.is_server_error() {
        status
    } else {
        StatusCode::BAD_GATEWAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_url_accepts_http_and_https() {
        assert!(parse_image_url(Some("https://example.org/a.png")).is_ok());
        assert!(parse_image_url(Some("http://example.org/b.jpg?size=large")).is_ok());
    }

    #[test]
    fn test_parse_image_url_rejects_other_inputs() {
        for raw in [
            None,
            Some(""),
            Some("/images/logo.png"),
            Some("example.org/a.png"),
            Some("ftp://example.org/a.png"),
            Some("data:image/png;base64,AAAA"),
            Some("javascript:alert(1)"),
        ] {
            assert!(
                matches!(parse_image_url(raw), Err(AppError::Validation(_))),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn test_relay_status_keeps_error_codes() {
        assert_eq!(relay_status(StatusCode::NOT_FOUND), StatusCode::NOT_FOUND);
        assert_eq!(
            relay_status(StatusCode::SERVICE_UNAVAILABLE),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            relay_status(StatusCode::NOT_MODIFIED),
            StatusCode::BAD_GATEWAY
        );
    }
}
