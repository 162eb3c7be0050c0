//! Draft data model.

use chrono::{DateTime, Utc};

use crate::template::{EmailTemplate, TemplateId};

/// Identifies the template a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKey {
    /// A template that exists on the server.
    Template(TemplateId),
    /// A template that has never been saved.
    New,
}

impl DraftKey {
    /// Key for a template.
    #[must_use]
    pub fn of(template: &EmailTemplate) -> Self {
        template.id.map_or(Self::New, Self::Template)
    }

    /// Storage form: the template id, or `new`.
    #[must_use]
    pub fn as_storage(&self) -> String {
        match self {
            Self::Template(id) => id.to_string(),
            Self::New => "new".to_string(),
        }
    }

    /// Parses the storage form.
    #[must_use]
    pub fn from_storage(value: &str) -> Option<Self> {
        if value == "new" {
            return Some(Self::New);
        }
        value.parse().ok().map(|id| Self::Template(TemplateId(id)))
    }
}

/// An unsaved version of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Template contents at save time.
    pub template: EmailTemplate,
    /// When the draft was written.
    pub saved_at: DateTime<Utc>,
}

impl Draft {
    /// Creates a draft stamped with the current time.
    #[must_use]
    pub fn new(template: EmailTemplate) -> Self {
        Self {
            template,
            saved_at: Utc::now(),
        }
    }

    /// Key the draft is stored under.
    #[must_use]
    pub fn key(&self) -> DraftKey {
        DraftKey::of(&self.template)
    }

    /// Returns true if the draft differs from the server copy.
    #[must_use]
    pub fn differs_from(&self, saved: &EmailTemplate) -> bool {
        self.template.name != saved.name
            || self.template.subject != saved.subject
            || self.template.body_html != saved.body_html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_storage_form() {
        assert_eq!(DraftKey::Template(TemplateId(7)).as_storage(), "7");
        assert_eq!(DraftKey::from_storage("7"), Some(DraftKey::Template(TemplateId(7))));
        assert_eq!(DraftKey::from_storage("new"), Some(DraftKey::New));
        assert_eq!(DraftKey::from_storage("x"), None);
    }

    #[test]
    fn test_differs_from() {
        let saved = EmailTemplate::new("Welcome", "Hi");
        let mut draft = Draft::new(saved.clone());
        assert!(!draft.differs_from(&saved));
        draft.template.body_html = "<p>changed</p>".into();
        assert!(draft.differs_from(&saved));
    }
}
