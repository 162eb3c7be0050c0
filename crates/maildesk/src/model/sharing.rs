//! State of the Drive sharing settings page.

use maildesk_core::sharing::THRESHOLD_RANGE;
use maildesk_core::{SharingError, SharingOption, SharingSettings};

#[derive(Debug, Clone, Default)]
pub struct SharingState {
    /// Last settings confirmed by the backend.
    pub saved: SharingSettings,
    /// Settings being edited.
    pub draft: SharingSettings,
    pub email_input: String,
    pub threshold_input: String,
    pub errors: Vec<SharingError>,
    pub is_loading: bool,
    pub is_saving: bool,
    pub error: Option<String>,
}

impl SharingState {
    /// Stores settings loaded from or saved to the backend.
    pub fn apply(&mut self, settings: SharingSettings) {
        self.threshold_input = settings.size_threshold_mb.to_string();
        self.saved = settings.clone();
        self.draft = settings;
        self.errors.clear();
        self.is_loading = false;
        self.is_saving = false;
        self.error = None;
    }

    /// Returns true if the form differs from the saved settings.
    pub fn is_modified(&self) -> bool {
        self.draft != self.saved
    }

    pub const fn set_option(&mut self, option: SharingOption) {
        self.draft.option = option;
    }

    pub const fn set_notify(&mut self, notify: bool) {
        self.draft.notify_recipients = notify;
    }

    /// Adds the typed address. The input is cleared only on success.
    pub fn add_email(&mut self) {
        match self.draft.add_email(&self.email_input) {
            Ok(()) => {
                self.email_input.clear();
                self.errors.retain(|e| *e != SharingError::NoRecipients);
            }
            Err(e) => self.errors = vec![e],
        }
    }

    pub fn remove_email(&mut self, email: &str) {
        self.draft.remove_email(email);
    }

    /// Updates the threshold input. Unparseable text leaves the stored
    /// value unchanged until it is fixed.
    pub fn set_threshold_input(&mut self, input: String) {
        if let Ok(mb) = input.trim().parse::<u32>() {
            self.draft.size_threshold_mb = mb;
        }
        self.threshold_input = input;
    }

    /// Returns true if the threshold input holds a value in range.
    pub fn threshold_is_valid(&self) -> bool {
        self.threshold_input
            .trim()
            .parse::<u32>()
            .is_ok_and(|mb| THRESHOLD_RANGE.contains(&mb))
    }

    /// Validates the form and returns the settings to save.
    pub fn prepare_save(&mut self) -> Option<SharingSettings> {
        let mut errors = self.draft.validate().err().unwrap_or_default();
        if self.threshold_input.trim().parse::<u32>().is_err() {
            errors.retain(|e| !matches!(e, SharingError::ThresholdOutOfRange(_)));
            errors.push(SharingError::ThresholdOutOfRange(0));
        }
        self.errors = errors;
        if self.errors.is_empty() {
            self.is_saving = true;
            Some(self.draft.clone())
        } else {
            None
        }
    }

    /// Discards unsaved edits.
    pub fn reset(&mut self) {
        let saved = self.saved.clone();
        self.apply(saved);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_requires_recipient() {
        let mut state = SharingState::default();
        state.apply(SharingSettings::default());
        state.set_option(SharingOption::Specific);
        assert!(state.prepare_save().is_none());
        assert_eq!(state.errors, vec![SharingError::NoRecipients]);

        state.email_input = " Ops@Example.com ".into();
        state.add_email();
        assert!(state.errors.is_empty());
        assert!(state.email_input.is_empty());
        let settings = state.prepare_save().unwrap();
        assert_eq!(settings.allowed_emails, vec!["ops@example.com".to_string()]);
    }

    #[test]
    fn test_invalid_email_keeps_input() {
        let mut state = SharingState::default();
        state.email_input = "not-an-email".into();
        state.add_email();
        assert_eq!(state.email_input, "not-an-email");
        assert!(matches!(state.errors[..], [SharingError::InvalidEmail(_)]));
    }

    #[test]
    fn test_threshold_input() {
        let mut state = SharingState::default();
        state.apply(SharingSettings::default());
        state.set_threshold_input("2000".into());
        assert!(!state.threshold_is_valid());
        assert!(state.prepare_save().is_none());

        state.set_threshold_input("abc".into());
        assert_eq!(state.draft.size_threshold_mb, 2000);
        assert!(state.prepare_save().is_none());

        state.set_threshold_input("50".into());
        assert!(state.is_modified());
        assert!(state.prepare_save().is_some());

        state.reset();
        assert!(!state.is_modified());
        assert_eq!(state.threshold_input, "25");
    }
}
