//! Offline cache controller.
//!
//! One controller exists per deployed version. It precaches the application
//! shell on install, sweeps stale cache generations on activation, then
//! answers every intercepted request according to the policy table.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use url::Url;

use super::http::{FetchRequest, FetchResponse, Network, NetworkError};
use super::policy::{classify, policy_for, CachePolicy};
use super::push::{ClientHost, HostError, Notification};
use super::storage::{Cache, CacheStorage};

/// Paths fetched into the static generation at install time.
pub const DEFAULT_PRECACHE: [&str; 3] = ["/", "/index.html", "/manifest.json"];

/// Controller settings for one deployed version.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Site origin; precache paths are resolved against it.
    pub origin: Url,
    /// Bumping the version is the only way to invalidate installed assets.
    pub version: String,
    pub cache_prefix: String,
    pub precache: Vec<String>,
    /// Last-resort document for failed navigations.
    pub shell_path: String,
    pub api_prefix: String,
}

impl ControllerConfig {
    pub fn new(origin: Url, version: impl Into<String>) -> Self {
        Self {
            origin,
            version: version.into(),
            cache_prefix: "parish".to_string(),
            precache: DEFAULT_PRECACHE.iter().map(|p| p.to_string()).collect(),
            shell_path: "/index.html".to_string(),
            api_prefix: "/api/".to_string(),
        }
    }

    pub fn static_cache_name(&self) -> String {
        format!("{}-static-{}", self.cache_prefix, self.version)
    }

    pub fn runtime_cache_name(&self) -> String {
        format!("{}-runtime-{}", self.cache_prefix, self.version)
    }
}

/// Lifecycle of one controller version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Installing,
    Installed,
    Active,
    /// Installation failed; this version never takes control.
    Redundant,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("invalid precache path {path}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("precache of {url} failed: {reason}")]
    Install { url: String, reason: String },

    #[error("cannot {action} while {state:?}")]
    InvalidState {
        action: &'static str,
        state: Lifecycle,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Offline cache controller for one deployed version.
pub struct OfflineCacheController {
    config: ControllerConfig,
    caches: Arc<CacheStorage>,
    network: Arc<dyn Network>,
    host: Arc<dyn ClientHost>,
    state: Lifecycle,
    cache_writes: Mutex<JoinSet<()>>,
}

impl OfflineCacheController {
    pub fn new(
        config: ControllerConfig,
        caches: Arc<CacheStorage>,
        network: Arc<dyn Network>,
        host: Arc<dyn ClientHost>,
    ) -> Self {
        Self {
            config,
            caches,
            network,
            host,
            state: Lifecycle::Installing,
            cache_writes: Mutex::new(JoinSet::new()),
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Precache the static set. All or nothing: one failed fetch aborts the
    /// install, stores nothing, and leaves this version redundant.
    pub async fn install(&mut self) -> Result<(), ControllerError> {
        if self.state != Lifecycle::Installing {
            return Err(ControllerError::InvalidState {
                action: "install",
                state: self.state,
            });
        }

        match self.fetch_precache().await {
            Ok(fetched) => {
                let cache = self.caches.open(&self.config.static_cache_name());
                for (request, response) in fetched {
                    cache.put(request.key(), response);
                }
                tracing::info!(
                    cache = %self.config.static_cache_name(),
                    entries = cache.len(),
                    "static assets precached"
                );
                self.state = Lifecycle::Installed;
                Ok(())
            }
            Err(e) => {
                tracing::error!("install failed: {}", e);
                self.state = Lifecycle::Redundant;
                Err(e)
            }
        }
    }

    async fn fetch_precache(&self) -> Result<Vec<(FetchRequest, FetchResponse)>, ControllerError> {
        let mut fetched = Vec::with_capacity(self.config.precache.len());

        for path in &self.config.precache {
            let url = self.resolve(path)?;
            let request = FetchRequest::get(url);
            let response =
                self.network
                    .fetch(&request)
                    .await
                    .map_err(|e| ControllerError::Install {
                        url: request.url.to_string(),
                        reason: e.to_string(),
                    })?;

            if !response.is_ok() {
                return Err(ControllerError::Install {
                    url: request.url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            fetched.push((request, response));
        }

        Ok(fetched)
    }

    /// Delete every generation that is not one of this version's two, then
    /// claim open pages. Returns the deleted generation names.
    pub async fn activate(&mut self) -> Result<Vec<String>, ControllerError> {
        if self.state != Lifecycle::Installed {
            return Err(ControllerError::InvalidState {
                action: "activate",
                state: self.state,
            });
        }

        let keep = [
            self.config.static_cache_name(),
            self.config.runtime_cache_name(),
        ];

        let mut deleted = Vec::new();
        for name in self.caches.names() {
            if !keep.contains(&name) && self.caches.delete(&name) {
                tracing::info!(cache = %name, "deleted stale cache generation");
                deleted.push(name);
            }
        }

        self.host.claim().await;
        self.state = Lifecycle::Active;
        Ok(deleted)
    }

    /// Answer one intercepted request.
    ///
    /// Until activation the controller does not intercept and every request
    /// goes straight to the network.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        if self.state != Lifecycle::Active {
            return self.network.fetch(request).await;
        }

        let class = classify(request, &self.config.api_prefix);
        match policy_for(class) {
            CachePolicy::NetworkOnly => self.network.fetch(request).await,
            CachePolicy::NetworkFirst => self.network_first(request).await,
            CachePolicy::CacheFirst => self.cache_first(request).await,
        }
    }

    async fn network_first(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    self.store_in_background(request, &response).await;
                }
                Ok(response)
            }
            Err(e) => {
                tracing::debug!(url = %request.url, "network failed, trying cache: {}", e);
                if let Some(cached) = self.lookup(request) {
                    return Ok(cached);
                }
                match self.shell() {
                    Some(shell) => Ok(shell),
                    None => Err(e),
                }
            }
        }
    }

    async fn cache_first(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        if let Some(cached) = self.lookup(request) {
            return Ok(cached);
        }

        let response = self.network.fetch(request).await?;
        if response.is_ok() {
            self.store_in_background(request, &response).await;
        }
        Ok(response)
    }

    /// Static generation first, then runtime.
    fn lookup(&self, request: &FetchRequest) -> Option<FetchResponse> {
        let key = request.key();
        [
            self.config.static_cache_name(),
            self.config.runtime_cache_name(),
        ]
        .iter()
        .filter_map(|name| self.caches.get(name))
        .find_map(|cache| cache.lookup(&key))
    }

    fn shell(&self) -> Option<FetchResponse> {
        let url = self.resolve(&self.config.shell_path).ok()?;
        self.lookup(&FetchRequest::get(url))
    }

    /// Copy a response into the runtime generation without delaying the caller.
    async fn store_in_background(&self, request: &FetchRequest, response: &FetchResponse) {
        let cache: Arc<Cache> = self.caches.open(&self.config.runtime_cache_name());
        let key = request.key();
        let copy = response.clone();

        let mut writes = self.cache_writes.lock().await;
        while let Some(result) = writes.try_join_next() {
            if let Err(e) = result {
                tracing::warn!("cache write task failed: {}", e);
            }
        }
        writes.spawn(async move {
            cache.put(key, copy);
        });
    }

    /// Wait until every background cache write has landed.
    pub async fn wait_for_cache_writes(&self) {
        let mut writes = std::mem::take(&mut *self.cache_writes.lock().await);
        while let Some(result) = writes.join_next().await {
            if let Err(e) = result {
                tracing::warn!("cache write task failed: {}", e);
            }
        }
    }

    /// Display the notification carried by a push message.
    pub async fn on_push(&self, data: &[u8]) -> Result<Notification, ControllerError> {
        let notification = Notification::from_push(data);
        self.host.show_notification(&notification).await?;
        Ok(notification)
    }

    /// Close the clicked notification and bring its target page forward.
    pub async fn on_notification_click(
        &self,
        notification: &Notification,
    ) -> Result<(), ControllerError> {
        self.host.close_notification(&notification.tag).await;

        if !self.host.focus_window(&notification.url).await {
            self.host.open_window(&notification.url).await?;
        }
        Ok(())
    }

    fn resolve(&self, path: &str) -> Result<Url, ControllerError> {
        self.config
            .origin
            .join(path)
            .map_err(|source| ControllerError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }
}
