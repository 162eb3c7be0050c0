//! Google Drive sharing settings for large attachments.
//!
//! Files above the size threshold are uploaded to Drive and the email
//! carries a link instead of the attachment. The sharing option decides who
//! can open that link.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upload threshold in megabytes.
pub const DEFAULT_THRESHOLD_MB: u32 = 25;

/// Allowed threshold range in megabytes.
pub const THRESHOLD_RANGE: std::ops::RangeInclusive<u32> = 1..=1024;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Who may open an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharingOption {
    /// Anyone with the link.
    #[default]
    Anyone,
    /// Only the uploading account.
    Restricted,
    /// Only the listed addresses.
    Specific,
}

impl SharingOption {
    /// All options in display order.
    pub const ALL: [Self; 3] = [Self::Anyone, Self::Restricted, Self::Specific];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anyone => "anyone",
            Self::Restricted => "restricted",
            Self::Specific => "specific",
        }
    }

    /// Radio button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Anyone => "Anyone with the link",
            Self::Restricted => "Restricted",
            Self::Specific => "Specific people",
        }
    }
}

/// Sharing validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SharingError {
    /// Address is not a valid email.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Address is already in the list.
    #[error("{0} is already in the list")]
    DuplicateEmail(String),

    /// `Specific` sharing without any address.
    #[error("Add at least one email address for specific sharing")]
    NoRecipients,

    /// Threshold outside the allowed range.
    #[error("Size threshold must be between 1 and 1024 MB (got {0})")]
    ThresholdOutOfRange(u32),
}

/// Drive sharing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingSettings {
    /// Visibility policy.
    #[serde(default)]
    pub option: SharingOption,
    /// Addresses granted access under [`SharingOption::Specific`].
    #[serde(default)]
    pub allowed_emails: Vec<String>,
    /// Files strictly larger than this are uploaded.
    #[serde(default = "default_threshold")]
    pub size_threshold_mb: u32,
    /// Whether Drive emails the people granted access.
    #[serde(default)]
    pub notify_recipients: bool,
}

const fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD_MB
}

impl Default for SharingSettings {
    fn default() -> Self {
        Self {
            option: SharingOption::default(),
            allowed_emails: Vec::new(),
            size_threshold_mb: DEFAULT_THRESHOLD_MB,
            notify_recipients: false,
        }
    }
}

impl SharingSettings {
    /// Adds an address after trimming and lowercasing it.
    ///
    /// # Errors
    ///
    /// Returns [`SharingError::InvalidEmail`] or
    /// [`SharingError::DuplicateEmail`].
    pub fn add_email(&mut self, email: &str) -> Result<(), SharingError> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(SharingError::InvalidEmail(email));
        }
        if self.allowed_emails.contains(&email) {
            return Err(SharingError::DuplicateEmail(email));
        }
        self.allowed_emails.push(email);
        Ok(())
    }

    /// Removes an address. Returns true if it was present.
    pub fn remove_email(&mut self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        let before = self.allowed_emails.len();
        self.allowed_emails.retain(|e| *e != email);
        self.allowed_emails.len() != before
    }

    /// Checks the settings before they are saved.
    ///
    /// # Errors
    ///
    /// Returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<SharingError>> {
        let mut errors = Vec::new();
        if self.option == SharingOption::Specific && self.allowed_emails.is_empty() {
            errors.push(SharingError::NoRecipients);
        }
        errors.extend(
            self.allowed_emails
                .iter()
                .filter(|e| !is_valid_email(e))
                .map(|e| SharingError::InvalidEmail(e.clone())),
        );
        if !THRESHOLD_RANGE.contains(&self.size_threshold_mb) {
            errors.push(SharingError::ThresholdOutOfRange(self.size_threshold_mb));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns true if a file of this size goes to Drive instead of being
    /// attached.
    #[must_use]
    pub fn should_upload(&self, file_size_bytes: u64) -> bool {
        file_size_bytes > u64::from(self.size_threshold_mb) * BYTES_PER_MB
    }

    /// Human description of the policy.
    #[must_use]
    pub fn description(&self) -> String {
        let who = match self.option {
            SharingOption::Anyone => "Anyone with the link can view uploaded files".to_string(),
            SharingOption::Restricted => "Only the uploading account can open uploaded files".to_string(),
            SharingOption::Specific => match self.allowed_emails.len() {
                0 => "No one has been granted access yet".to_string(),
                1 => format!("Only {} can view uploaded files", self.allowed_emails[0]),
                n => format!("{n} people can view uploaded files"),
            },
        };
        format!(
            "{who}. Files larger than {} MB are uploaded to Google Drive.",
            self.size_threshold_mb
        )
    }
}

/// Basic email shape check: one `@`, non-empty local part, dotted domain
/// without empty labels.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@sub.example.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn test_add_email_normalizes_and_dedupes() {
        let mut settings = SharingSettings::default();
        settings.add_email("  Alice@Example.COM ").unwrap();
        assert_eq!(settings.allowed_emails, vec!["alice@example.com"]);
        assert_eq!(
            settings.add_email("alice@example.com"),
            Err(SharingError::DuplicateEmail("alice@example.com".into()))
        );
        assert!(matches!(
            settings.add_email("nope"),
            Err(SharingError::InvalidEmail(_))
        ));
        assert!(settings.remove_email("ALICE@example.com"));
        assert!(!settings.remove_email("alice@example.com"));
    }

    #[test]
    fn test_validate() {
        let mut settings = SharingSettings {
            option: SharingOption::Specific,
            size_threshold_mb: 0,
            ..SharingSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(vec![
                SharingError::NoRecipients,
                SharingError::ThresholdOutOfRange(0)
            ])
        );
        settings.add_email("bob@example.org").unwrap();
        settings.size_threshold_mb = 1024;
        assert!(settings.validate().is_ok());
        settings.size_threshold_mb = 1025;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_should_upload_is_strictly_greater() {
        let settings = SharingSettings::default();
        let limit = 25 * 1024 * 1024;
        assert!(!settings.should_upload(limit));
        assert!(settings.should_upload(limit + 1));
    }

    #[test]
    fn test_description() {
        let mut settings = SharingSettings::default();
        assert!(settings.description().starts_with("Anyone with the link"));
        settings.option = SharingOption::Specific;
        settings.add_email("a@b.co").unwrap();
        assert!(settings.description().contains("Only a@b.co"));
        assert!(settings.description().contains("25 MB"));
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_value(SharingSettings::default()).unwrap();
        assert_eq!(json["option"], "anyone");
        assert_eq!(json["size_threshold_mb"], 25);

        let parsed: SharingSettings = serde_json::from_str(r#"{"option": "restricted"}"#).unwrap();
        assert_eq!(parsed.option, SharingOption::Restricted);
        assert_eq!(parsed.size_threshold_mb, DEFAULT_THRESHOLD_MB);
    }
}
