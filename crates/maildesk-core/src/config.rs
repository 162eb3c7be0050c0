//! Application configuration.
//!
//! Stored as JSON at `<config dir>/maildesk/config.json`. Missing files and
//! missing fields fall back to defaults; a few fields can be overridden from
//! the environment for scripted runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Application directory name under the platform config and data dirs.
pub const APP_DIR: &str = "maildesk";

/// Environment variable overriding [`AppConfig::api_base_url`].
pub const ENV_API_URL: &str = "MAILDESK_API_URL";
/// Environment variable overriding [`AppConfig::use_mock`].
pub const ENV_USE_MOCK: &str = "MAILDESK_USE_MOCK";
/// Environment variable overriding [`AppConfig::page_size`].
pub const ENV_PAGE_SIZE: &str = "MAILDESK_PAGE_SIZE";

/// Accepted page sizes.
pub const PAGE_SIZE_RANGE: std::ops::RangeInclusive<usize> = 5..=200;

/// Configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API base URL does not parse.
    #[error("invalid API URL {url:?}: {source}")]
    InvalidUrl {
        /// Offending value.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },

    /// The API base URL is not http or https.
    #[error("API URL must use http or https: {0}")]
    UnsupportedScheme(String),

    /// Page size outside [`PAGE_SIZE_RANGE`].
    #[error("page size must be between 5 and 200 (got {0})")]
    PageSize(usize),

    /// An environment override has an unusable value.
    #[error("invalid value for {name}: {value:?}")]
    Env {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// Reading or writing the file failed.
    #[error("config file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid JSON for this schema.
    #[error("config file {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Backend connection and UI behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend root, e.g. `http://localhost:8000`.
    pub api_base_url: String,
    /// Use the in-process mock backend instead of HTTP.
    pub use_mock: bool,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Rows per records page.
    pub page_size: usize,
    /// Number of log lines requested from the backend.
    pub log_tail_lines: usize,
    /// Auto-refresh interval; 0 disables.
    pub auto_refresh_secs: u64,
    /// Simulated mock latency.
    pub mock_latency_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            use_mock: true,
            request_timeout_secs: 30,
            page_size: crate::records::DEFAULT_PAGE_SIZE,
            log_tail_lines: 500,
            auto_refresh_secs: 30,
            mock_latency_ms: 250,
        }
    }
}

impl AppConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Auto-refresh interval, or `None` when disabled.
    #[must_use]
    pub const fn auto_refresh(&self) -> Option<Duration> {
        if self.auto_refresh_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.auto_refresh_secs))
        }
    }

    /// Simulated mock latency.
    #[must_use]
    pub const fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.api_base_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.api_base_url.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(self.api_base_url.clone()));
        }
        if !PAGE_SIZE_RANGE.contains(&self.page_size) {
            return Err(ConfigError::PageSize(self.page_size));
        }
        Ok(())
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] for unparseable values.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] for unparseable values.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            debug!("{ENV_API_URL} override: {url}");
            self.api_base_url = url.trim().to_string();
        }
        if let Some(value) = lookup(ENV_USE_MOCK) {
            self.use_mock = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Env {
                        name: ENV_USE_MOCK,
                        value,
                    });
                }
            };
        }
        if let Some(value) = lookup(ENV_PAGE_SIZE) {
            self.page_size = value.trim().parse().map_err(|_| ConfigError::Env {
                name: ENV_PAGE_SIZE,
                value: value.clone(),
            })?;
        }
        Ok(())
    }

    /// Loads the configuration file, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads from the default location, applies environment overrides and
    /// validates.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, overriding or validation fails.
    pub async fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&config_path()).await?;
        config.apply_env_overrides()?;
        config.validate()?;
        info!(
            "Config loaded: backend={} mock={}",
            config.api_base_url, config.use_mock
        );
        Ok(config)
    }

    /// Writes the configuration as pretty JSON, creating parent dirs.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tokio::fs::write(path, contents).await.map_err(io)?;
        info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Writes to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path()).await
    }
}

/// `<config dir>/maildesk`.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// `<data dir>/maildesk`.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Path of `config.json`.
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Path of the local draft database.
#[must_use]
pub fn database_path() -> PathBuf {
    data_dir().join("maildesk.db")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.use_mock);
        assert_eq!(config.auto_refresh(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AppConfig {
            api_base_url: "not a url".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

        let config = AppConfig {
            api_base_url: "ftp://example.com".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::UnsupportedScheme(_))));

        let config = AppConfig {
            page_size: 500,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PageSize(500))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env(&[
                (ENV_API_URL, " https://mail.example.com "),
                (ENV_USE_MOCK, "no"),
                (ENV_PAGE_SIZE, "50"),
            ]))
            .unwrap();
        assert_eq!(config.api_base_url, "https://mail.example.com");
        assert!(!config.use_mock);
        assert_eq!(config.page_size, 50);

        let err = config.apply_overrides(env(&[(ENV_PAGE_SIZE, "lots")]));
        assert!(matches!(err, Err(ConfigError::Env { name: ENV_PAGE_SIZE, .. })));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"use_mock": false}"#).unwrap();
        assert!(!config.use_mock);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_tail_lines, 500);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("maildesk-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");

        let missing = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(missing, AppConfig::default());

        let config = AppConfig {
            auto_refresh_secs: 0,
            ..AppConfig::default()
        };
        config.save_to(&path).await.unwrap();
        let loaded = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.auto_refresh(), None);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
