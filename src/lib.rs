//! Parish Site Backend
//!
//! Metadata read/write endpoints over an S3-compatible object store, an image
//! proxy, static hosting of the built site, and the offline cache controller
//! used by the site's progressive web app.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod offline;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use config::Config;
use store::MetadataRepository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub metadata: MetadataRepository,
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Only writes are guarded by the PSK; the configuration check wraps it
    let psk = state.config.api_psk.clone();
    let config = state.config.clone();
    let save_metadata = post(api::save_metadata)
        .layer(DefaultBodyLimit::max(api::MAX_METADATA_BYTES))
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }))
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            api::require_storage_config(config.clone(), req, next)
        }));

    let api_routes = Router::new()
        .route("/metadata", get(api::get_metadata).merge(save_metadata))
        .route("/image-proxy", get(api::proxy_image));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    let mut router = Router::new().nest("/api", api_routes).merge(health_routes);

    // Built site, with the application shell answering unknown paths
    if let Some(dir) = &state.config.static_dir {
        let shell = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).fallback(shell));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
