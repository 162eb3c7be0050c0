//! Email template model and placeholder handling.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::Document;

/// Server-assigned template identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub u64);

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An email template with an HTML body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Identifier; `None` until first saved.
    #[serde(default)]
    pub id: Option<TemplateId>,
    /// Display name.
    pub name: String,
    /// Subject line, may contain placeholders.
    pub subject: String,
    /// HTML body, may contain placeholders.
    #[serde(default)]
    pub body_html: String,
    /// Last modification time reported by the server.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A template field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateProblem {
    /// Name is blank.
    MissingName,
    /// Subject is blank.
    MissingSubject,
    /// A `{{` has no matching `}}`.
    UnclosedPlaceholder,
}

impl TemplateProblem {
    /// Human-readable message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MissingName => "Template name is required",
            Self::MissingSubject => "Subject is required",
            Self::UnclosedPlaceholder => "Placeholder is missing a closing }}",
        }
    }
}

impl std::fmt::Display for TemplateProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for TemplateProblem {}

impl EmailTemplate {
    /// Creates an unsaved template.
    #[must_use]
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Returns true if the template has never been saved.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Parses the body into an editable document.
    #[must_use]
    pub fn document(&self) -> Document {
        Document::from_html(&self.body_html)
    }

    /// Distinct placeholder names in subject then body, in first-seen order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for text in [&self.subject, &self.body_html] {
            for (_, name) in scan(text) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Returns subject and body with known placeholders substituted.
    ///
    /// Values are HTML-escaped in the body. Unknown placeholders are left as
    /// written.
    #[must_use]
    pub fn render(&self, values: &HashMap<String, String>) -> (String, String) {
        (
            substitute(&self.subject, values, false),
            substitute(&self.body_html, values, true),
        )
    }

    /// Checks required fields and placeholder syntax.
    ///
    /// # Errors
    ///
    /// Returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<TemplateProblem>> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push(TemplateProblem::MissingName);
        }
        if self.subject.trim().is_empty() {
            problems.push(TemplateProblem::MissingSubject);
        }
        if [&self.subject, &self.body_html].iter().any(|t| has_unclosed(t)) {
            problems.push(TemplateProblem::UnclosedPlaceholder);
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

/// Finds `{{ name }}` occurrences, yielding the byte range and trimmed name.
fn scan(text: &str) -> Vec<(std::ops::Range<usize>, &str)> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(open) = text[from..].find("{{") {
        let start = from + open;
        let Some(close) = text[start + 2..].find("}}") else {
            break;
        };
        let end = start + 2 + close + 2;
        let name = text[start + 2..end - 2].trim();
        if is_placeholder_name(name) {
            found.push((start..end, name));
            from = end;
        } else {
            from = start + 2;
        }
    }
    found
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn substitute(text: &str, values: &HashMap<String, String>, html: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (range, name) in scan(text) {
        if let Some(value) = values.get(name) {
            out.push_str(&text[last..range.start]);
            if html {
                out.push_str(&html_escape::encode_text(value));
            } else {
                out.push_str(value);
            }
            last = range.end;
        }
    }
    out.push_str(&text[last..]);
    out
}

fn has_unclosed(text: &str) -> bool {
    text.rfind("{{")
        .is_some_and(|open| !text[open..].contains("}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> EmailTemplate {
        EmailTemplate {
            body_html: "<p>Hello {{ first_name }}, your file {{file.name}} is ready. {{first_name}}</p>"
                .into(),
            ..EmailTemplate::new("Delivery", "Your {{report}} for {{ first_name }}")
        }
    }

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        assert_eq!(
            template().placeholders(),
            vec!["report", "first_name", "file.name"]
        );
    }

    #[test]
    fn test_render_leaves_unknown() {
        let values = HashMap::from([("first_name".to_string(), "Ada".to_string())]);
        let (subject, body) = template().render(&values);
        assert_eq!(subject, "Your {{report}} for Ada");
        assert_eq!(
            body,
            "<p>Hello Ada, your file {{file.name}} is ready. Ada</p>"
        );
    }

    #[test]
    fn test_render_escapes_body_values_only() {
        let values = HashMap::from([
            ("first_name".to_string(), "<b>Ada</b> & co".to_string()),
            ("report".to_string(), "Q1 <draft>".to_string()),
        ]);
        let (subject, body) = template().render(&values);
        assert_eq!(subject, "Your Q1 <draft> for <b>Ada</b> & co");
        assert!(body.starts_with("<p>Hello &lt;b&gt;Ada&lt;/b&gt; &amp; co, your file"));
        assert!(!body.contains("<b>"));
    }

    #[test]
    fn test_braces_that_are_not_placeholders() {
        let t = EmailTemplate::new("x", "{{ not valid! }} {{ok}}");
        assert_eq!(t.placeholders(), vec!["ok"]);
    }

    #[test]
    fn test_validate() {
        assert!(template().validate().is_ok());
        let t = EmailTemplate::new("  ", "Hi {{name");
        assert_eq!(
            t.validate(),
            Err(vec![
                TemplateProblem::MissingName,
                TemplateProblem::UnclosedPlaceholder
            ])
        );
        assert_eq!(
            EmailTemplate::new("n", "").validate(),
            Err(vec![TemplateProblem::MissingSubject])
        );
    }

    #[test]
    fn test_serde_defaults() {
        let t: EmailTemplate =
            serde_json::from_str(r#"{"id": 3, "name": "Welcome", "subject": "Hi"}"#).unwrap_or_default();
        assert_eq!(t.id, Some(TemplateId(3)));
        assert!(t.body_html.is_empty());
        assert!(!t.is_new());
    }
}
