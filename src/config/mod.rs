//! Configuration module for the parish backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_BIND_ADDR: &str = "PARISH_BIND_ADDR";
pub const ENV_LOG_LEVEL: &str = "PARISH_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "PARISH_LOG_FORMAT";
pub const ENV_API_PSK: &str = "PARISH_API_PSK";
pub const ENV_STATIC_DIR: &str = "PARISH_STATIC_DIR";
pub const ENV_S3_ENDPOINT: &str = "PARISH_S3_ENDPOINT";
pub const ENV_S3_BUCKET: &str = "PARISH_S3_BUCKET";
pub const ENV_S3_REGION: &str = "PARISH_S3_REGION";
pub const ENV_S3_ACCESS_KEY_ID: &str = "PARISH_S3_ACCESS_KEY_ID";
pub const ENV_S3_SECRET_ACCESS_KEY: &str = "PARISH_S3_SECRET_ACCESS_KEY";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Object store connection settings.
///
/// Every field except the region is required before the write endpoint
/// accepts requests.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl StorageConfig {
    /// Names of the required environment variables that are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (ENV_S3_ENDPOINT, &self.endpoint),
            (ENV_S3_BUCKET, &self.bucket),
            (ENV_S3_ACCESS_KEY_ID, &self.access_key_id),
            (ENV_S3_SECRET_ACCESS_KEY, &self.secret_access_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key protecting the write endpoint (open when unset)
    pub api_psk: Option<String>,
    /// Directory holding the built single-page application, if served here
    pub static_dir: Option<PathBuf>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    pub storage: StorageConfig,
}

/// Raised when an environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_psk = non_empty(ENV_API_PSK);

        let static_dir = non_empty(ENV_STATIC_DIR).map(PathBuf::from);

        let raw_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = raw_addr.parse().map_err(|_| ConfigError {
            name: ENV_BIND_ADDR,
            value: raw_addr.clone(),
        })?;

        let log_level = env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var(ENV_LOG_FORMAT).as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let storage = StorageConfig {
            endpoint: non_empty(ENV_S3_ENDPOINT),
            bucket: non_empty(ENV_S3_BUCKET),
            region: non_empty(ENV_S3_REGION).unwrap_or_else(|| "auto".to_string()),
            access_key_id: non_empty(ENV_S3_ACCESS_KEY_ID),
            secret_access_key: non_empty(ENV_S3_SECRET_ACCESS_KEY),
        };

        Ok(Self {
            api_psk,
            static_dir,
            bind_addr,
            log_level,
            log_format,
            storage,
        })
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for name in [
            ENV_API_PSK,
            ENV_STATIC_DIR,
            ENV_BIND_ADDR,
            ENV_LOG_LEVEL,
            ENV_LOG_FORMAT,
            ENV_S3_ENDPOINT,
            ENV_S3_BUCKET,
            ENV_S3_REGION,
            ENV_S3_ACCESS_KEY_ID,
            ENV_S3_SECRET_ACCESS_KEY,
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert!(config.static_dir.is_none());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.storage.region, "auto");
        assert_eq!(config.storage.missing().len(), 4);
    }

    #[test]
    fn test_missing_storage_names_only_absent_items() {
        let storage = StorageConfig {
            endpoint: Some("https://example.r2.cloudflarestorage.com".to_string()),
            bucket: Some("parish".to_string()),
            region: "auto".to_string(),
            access_key_id: Some("   ".to_string()),
            secret_access_key: None,
        };

        assert_eq!(
            storage.missing(),
            vec![ENV_S3_ACCESS_KEY_ID, ENV_S3_SECRET_ACCESS_KEY]
        );
        assert!(!storage.is_complete());
    }
}
