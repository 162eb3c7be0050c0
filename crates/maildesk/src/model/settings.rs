//! Settings model.

use maildesk_core::AppConfig;

use crate::style::widgets::palette::ThemeMode;

/// Form state for the settings screen.
#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub api_url_input: String,
    pub use_mock: bool,
    pub page_size_input: String,
    pub refresh_input: String,
    pub token_input: String,
    /// Whether a token is stored in the keyring for the current URL.
    pub has_token: bool,
    pub error: Option<String>,
    pub is_saving: bool,
}

impl SettingsState {
    /// Fills the form from a configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig, has_token: bool) -> Self {
        Self {
            api_url_input: config.api_base_url.clone(),
            use_mock: config.use_mock,
            page_size_input: config.page_size.to_string(),
            refresh_input: config.auto_refresh_secs.to_string(),
            token_input: String::new(),
            has_token,
            error: None,
            is_saving: false,
        }
    }

    /// Builds the configuration the form describes, starting from `base`
    /// for fields the form does not show.
    pub fn to_config(&self, base: &AppConfig) -> Result<AppConfig, String> {
        let page_size = self
            .page_size_input
            .trim()
            .parse()
            .map_err(|_| "Page size must be a number".to_string())?;
        let auto_refresh_secs = self
            .refresh_input
            .trim()
            .parse()
            .map_err(|_| "Refresh interval must be a number of seconds".to_string())?;
        let config = AppConfig {
            api_base_url: self.api_url_input.trim().trim_end_matches('/').to_string(),
            use_mock: self.use_mock,
            page_size,
            auto_refresh_secs,
            ..base.clone()
        };
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

/// UI preferences that persist across sessions.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct AppSettings {
    #[serde(with = "theme_mode_serde")]
    pub theme_mode: ThemeMode,
    #[serde(default = "default_sidebar")]
    pub sidebar_visible: bool,
}

const fn default_sidebar() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Light,
            sidebar_visible: true,
        }
    }
}

mod theme_mode_serde {
    use super::ThemeMode;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde with= signature
    pub fn serialize<S>(mode: &ThemeMode, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match mode {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        serializer.serialize_str(s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ThemeMode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "dark" => Ok(ThemeMode::Dark),
            _ => Ok(ThemeMode::Light),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_round_trips_config() {
        let config = AppConfig::default();
        let form = SettingsState::from_config(&config, false);
        assert_eq!(form.to_config(&config).unwrap(), config);
    }

    #[test]
    fn test_form_rejects_bad_values() {
        let config = AppConfig::default();
        let mut form = SettingsState::from_config(&config, false);
        form.page_size_input = "many".into();
        assert!(form.to_config(&config).is_err());

        form.page_size_input = "1000".into();
        assert!(form.to_config(&config).is_err());

        form.page_size_input = "50".into();
        form.api_url_input = "ftp://example.com".into();
        assert!(form.to_config(&config).is_err());

        form.api_url_input = "https://mail.example.com/".into();
        assert_eq!(
            form.to_config(&config).unwrap().api_base_url,
            "https://mail.example.com"
        );
    }

    #[test]
    fn test_app_settings_defaults_missing_fields() {
        let settings: AppSettings = serde_json::from_str(r#"{"theme_mode":"dark"}"#).unwrap();
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
        assert!(settings.sidebar_visible);
    }
}
