//! Backend access.
//!
//! [`ApiClient`] dispatches every operation either to the REST backend
//! ([`HttpApi`]) or to the in-process [`MockApi`], chosen by configuration.
//! Both return the same types, so the UI does not care which one it talks
//! to.

mod http;
mod mock;

pub use http::HttpApi;
pub use mock::{DEFAULT_RECORD_COUNT, DEFAULT_SEED, MockApi};

use tracing::info;

use crate::config::AppConfig;
use crate::error::Result;
use crate::records::{EmailRecord, Page, RecordId, RecordQuery, StatusSummary};
use crate::sharing::SharingSettings;
use crate::template::EmailTemplate;

/// Either backend implementation.
#[derive(Debug, Clone)]
pub enum ApiClient {
    /// Real REST backend.
    Http(HttpApi),
    /// In-memory mock.
    Mock(MockApi),
}

macro_rules! dispatch {
    ($self:ident, $method:ident($($arg:expr),*)) => {
        match $self {
            Self::Http(api) => api.$method($($arg),*).await,
            Self::Mock(api) => api.$method($($arg),*).await,
        }
    };
}

impl ApiClient {
    /// Builds the client selected by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &AppConfig, token: Option<String>) -> Result<Self> {
        if config.use_mock {
            info!("Using mock backend");
            Ok(Self::Mock(MockApi::new(DEFAULT_SEED, config.mock_latency())))
        } else {
            info!("Using backend at {}", config.api_base_url);
            Ok(Self::Http(HttpApi::new(
                &config.api_base_url,
                config.request_timeout(),
                token,
            )?))
        }
    }

    /// Returns true for the mock backend.
    #[must_use]
    pub const fn is_mock(&self) -> bool {
        matches!(self, Self::Mock(_))
    }

    /// Short description for the status bar.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Http(api) => api.base_url().as_str().trim_end_matches('/').to_string(),
            Self::Mock(_) => "Mock data".to_string(),
        }
    }

    /// Lists a page of email records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn list_records(&self, query: &RecordQuery) -> Result<Page<EmailRecord>> {
        dispatch!(self, list_records(query))
    }

    /// Counts records per delivery status.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn status_summary(&self) -> Result<StatusSummary> {
        dispatch!(self, status_summary())
    }

    /// Requeues failed records; returns how many were accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn resend(&self, ids: &[RecordId]) -> Result<usize> {
        dispatch!(self, resend(ids))
    }

    /// Deletes records; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn delete_records(&self, ids: &[RecordId]) -> Result<usize> {
        dispatch!(self, delete_records(ids))
    }

    /// Fetches the tail of the service log.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn fetch_logs(&self, lines: usize) -> Result<String> {
        dispatch!(self, fetch_logs(lines))
    }

    /// Lists email templates.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn list_templates(&self) -> Result<Vec<EmailTemplate>> {
        dispatch!(self, list_templates())
    }

    /// Creates or updates a template and returns the stored version.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn save_template(&self, template: &EmailTemplate) -> Result<EmailTemplate> {
        dispatch!(self, save_template(template))
    }

    /// Loads the Drive sharing settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn sharing_settings(&self) -> Result<SharingSettings> {
        dispatch!(self, sharing_settings())
    }

    /// Stores the Drive sharing settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn save_sharing_settings(&self, settings: &SharingSettings) -> Result<()> {
        dispatch!(self, save_sharing_settings(settings))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_backend() {
        let config = AppConfig::default();
        let api = ApiClient::from_config(&config, None).unwrap();
        assert!(api.is_mock());
        assert_eq!(api.describe(), "Mock data");

        let config = AppConfig {
            use_mock: false,
            api_base_url: "http://localhost:9000".into(),
            ..AppConfig::default()
        };
        let api = ApiClient::from_config(&config, Some("t".into())).unwrap();
        assert!(!api.is_mock());
        assert_eq!(api.describe(), "http://localhost:9000");
    }

    #[tokio::test]
    async fn test_dispatch_to_mock() {
        let api = ApiClient::Mock(MockApi::default());
        let summary = api.status_summary().await.unwrap();
        assert_eq!(summary.total as usize, DEFAULT_RECORD_COUNT);
        assert_eq!(api.list_templates().await.unwrap().len(), 2);
    }
}
