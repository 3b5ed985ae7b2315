//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Primary environment variable for the backend base URL.
pub const BACKEND_URL_VAR: &str = "CAREER_PATH_BACKEND_URL";
/// Fallback variable name used by the web front end.
pub const LEGACY_BACKEND_URL_VAR: &str = "NEXT_PUBLIC_BACKEND_URL";
pub const DATA_DIR_VAR: &str = "CAREER_PATH_DATA_DIR";
pub const HTTP_TIMEOUT_VAR: &str = "CAREER_PATH_HTTP_TIMEOUT_SECS";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without trailing slash. `None` means every network
    /// operation fails with [`ConfigError::MissingBackendUrl`].
    pub backend_url: Option<String>,
    /// Directory holding persisted client state (session, last roadmap, logs).
    pub data_dir: PathBuf,
    /// Per-request timeout.
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            data_dir: default_data_dir(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup(BACKEND_URL_VAR)
            .or_else(|| lookup(LEGACY_BACKEND_URL_VAR))
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let http_timeout = match lookup(HTTP_TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: HTTP_TIMEOUT_VAR.to_string(),
                    message: format!("expected whole seconds, got {raw:?}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: HTTP_TIMEOUT_VAR.to_string(),
                        message: "timeout must be positive".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_HTTP_TIMEOUT,
        };

        Ok(Self {
            backend_url,
            data_dir,
            http_timeout,
        })
    }

    /// Set the backend URL, trimming any trailing slash.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.backend_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// The backend base URL, or a configuration error if unset.
    pub fn require_backend_url(&self) -> Result<&str, ConfigError> {
        self.backend_url
            .as_deref()
            .ok_or(ConfigError::MissingBackendUrl)
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".career-path")
}
