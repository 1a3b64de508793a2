//! Push message parsing and the client host seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Parish News";
pub const DEFAULT_BODY: &str = "There is a new announcement from the parish.";
pub const DEFAULT_TAG: &str = "parish-notification";
pub const DEFAULT_URL: &str = "/";
pub const NOTIFICATION_ICON: &str = "/icons/icon-192x192.png";
pub const NOTIFICATION_BADGE: &str = "/icons/icon-72x72.png";

/// A system notification ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub icon: String,
    pub badge: String,
    /// Page opened when the notification is clicked.
    pub url: String,
}

impl Notification {
    /// Build a notification from raw push data.
    ///
    /// Anything that is not a JSON object is treated as an empty object, and
    /// every absent field falls back to a fixed default.
    pub fn from_push(data: &[u8]) -> Self {
        let payload: Value = serde_json::from_slice(data).unwrap_or_else(|e| {
            tracing::debug!("push payload is not JSON: {}", e);
            Value::Null
        });
        // Fields are read one by one so a mistyped field only loses itself
        let field = |name: &str| payload.get(name).and_then(Value::as_str);

        Self {
            title: field("title").unwrap_or(DEFAULT_TITLE).to_string(),
            body: field("body").unwrap_or(DEFAULT_BODY).to_string(),
            tag: field("tag").unwrap_or(DEFAULT_TAG).to_string(),
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_BADGE.to_string(),
            url: field("url")
                .filter(|u| !u.is_empty())
                .unwrap_or(DEFAULT_URL)
                .to_string(),
        }
    }
}

/// Failure reported by the hosting environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("client host error: {0}")]
pub struct HostError(pub String);

/// The environment hosting the controller: open pages and the system
/// notification tray.
#[async_trait]
pub trait ClientHost: Send + Sync + 'static {
    /// Take control of already-open pages without waiting for a navigation.
    async fn claim(&self);

    async fn show_notification(&self, notification: &Notification) -> Result<(), HostError>;

    async fn close_notification(&self, tag: &str);

    /// Focus a window already showing `url`. Returns false when there is none.
    async fn focus_window(&self, url: &str) -> bool;

    async fn open_window(&self, url: &str) -> Result<(), HostError>;
}

/// Host with no pages and no notification tray.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

#[async_trait]
impl ClientHost for HeadlessHost {
    async fn claim(&self) {}

    async fn show_notification(&self, notification: &Notification) -> Result<(), HostError> {
        tracing::info!(title = %notification.title, tag = %notification.tag, "notification");
        Ok(())
    }

    async fn close_notification(&self, _tag: &str) {}

    async fn focus_window(&self, _url: &str) -> bool {
        false
    }

    async fn open_window(&self, url: &str) -> Result<(), HostError> {
        tracing::info!(%url, "open window requested");
        Ok(())
    }
}
