//! Parish site backend server.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parish_backend::api::build_http_client;
use parish_backend::config::{Config, LogFormat};
use parish_backend::store::{MetadataRepository, ObjectStore, S3Store, UnconfiguredStore};
use parish_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting parish site backend");
    tracing::info!("Bind address: {}", config.bind_addr);
    match &config.static_dir {
        Some(dir) => tracing::info!("Serving static site from {:?}", dir),
        None => tracing::info!("No static directory configured, API only"),
    }

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (PARISH_API_PSK). Metadata writes are open!");
    }

    // Initialize object store
    let store: Arc<dyn ObjectStore> = match S3Store::from_config(&config.storage) {
        Ok(store) => {
            tracing::info!(
                "Object store bucket: {}",
                config.storage.bucket.as_deref().unwrap_or_default()
            );
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Object store unavailable: {}", e);
            Arc::new(UnconfiguredStore::new(config.storage.missing()))
        }
    };

    // Create application state
    let state = AppState {
        metadata: MetadataRepository::new(store),
        http: build_http_client()?,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
