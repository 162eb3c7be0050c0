//! REST client for the email management backend.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::records::{EmailRecord, Page, RecordId, RecordQuery, StatusSummary};
use crate::sharing::SharingSettings;
use crate::template::EmailTemplate;

/// Body of the bulk resend and delete calls.
#[derive(Debug, Serialize)]
struct IdsRequest<'a> {
    ids: &'a [RecordId],
}

/// Result of a bulk call. Backends report the count under various names.
#[derive(Debug, Default, Deserialize)]
struct AffectedResponse {
    #[serde(alias = "count", alias = "updated", alias = "deleted", alias = "resent")]
    affected: Option<usize>,
}

/// List endpoints answer either with a page envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordsResponse {
    Page(Page<EmailRecord>),
    Records { records: Vec<EmailRecord> },
    Bare(Vec<EmailRecord>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TemplatesResponse {
    Wrapped { templates: Vec<EmailTemplate> },
    Bare(Vec<EmailTemplate>),
}

/// HTTP implementation of the backend API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpApi {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("maildesk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Backend root URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base.join(path.trim_start_matches('/'))?;
        debug!("{method} {url}");
        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// `GET /api/email-records`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn list_records(&self, query: &RecordQuery) -> Result<Page<EmailRecord>> {
        let builder = self
            .request(Method::GET, "api/email-records")?
            .query(&query.to_query_pairs());
        Ok(match Self::json::<RecordsResponse>(builder).await? {
            RecordsResponse::Page(page) => page,
            RecordsResponse::Records { records } | RecordsResponse::Bare(records) => {
                query.apply(&records)
            }
        })
    }

    /// `GET /api/email-records/summary`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn status_summary(&self) -> Result<StatusSummary> {
        Self::json(self.request(Method::GET, "api/email-records/summary")?).await
    }

    /// `POST /api/email-records/resend`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn resend(&self, ids: &[RecordId]) -> Result<usize> {
        self.bulk("api/email-records/resend", ids).await
    }

    /// `POST /api/email-records/delete`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn delete_records(&self, ids: &[RecordId]) -> Result<usize> {
        self.bulk("api/email-records/delete", ids).await
    }

    async fn bulk(&self, path: &str, ids: &[RecordId]) -> Result<usize> {
        let builder = self
            .request(Method::POST, path)?
            .json(&IdsRequest { ids });
        let response = check(builder.send().await?).await?;
        let body = response.text().await?;
        let parsed: AffectedResponse = serde_json::from_str(&body).unwrap_or_default();
        Ok(parsed.affected.unwrap_or(ids.len()))
    }

    /// `GET /api/logs?lines=N`.
    ///
    /// Accepts a text body, a JSON string, or a JSON object carrying the
    /// text under `logs`/`content` or as a `lines` array.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn fetch_logs(&self, lines: usize) -> Result<String> {
        let builder = self
            .request(Method::GET, "api/logs")?
            .query(&[("lines", lines.to_string())]);
        let response = check(builder.send().await?).await?;
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));
        let body = response.text().await?;
        if !is_json {
            return Ok(body);
        }
        Ok(match serde_json::from_str::<Value>(&body) {
            Ok(Value::String(text)) => text,
            Ok(Value::Object(map)) => {
                if let Some(Value::Array(lines)) = map.get("lines") {
                    lines
                        .iter()
                        .map(|l| l.as_str().map_or_else(|| l.to_string(), str::to_string))
                        .collect::<Vec<_>>()
                        .join("\n")
                } else {
                    ["logs", "content"]
                        .iter()
                        .find_map(|k| map.get(*k).and_then(Value::as_str))
                        .map_or(body.clone(), str::to_string)
                }
            }
            _ => body,
        })
    }

    /// `GET /api/templates`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn list_templates(&self) -> Result<Vec<EmailTemplate>> {
        Ok(
            match Self::json::<TemplatesResponse>(self.request(Method::GET, "api/templates")?)
                .await?
            {
                TemplatesResponse::Wrapped { templates } | TemplatesResponse::Bare(templates) => {
                    templates
                }
            },
        )
    }

    /// `PUT /api/templates/{id}`, or `POST /api/templates` for a new one.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn save_template(&self, template: &EmailTemplate) -> Result<EmailTemplate> {
        let builder = match template.id {
            Some(id) => self.request(Method::PUT, &format!("api/templates/{id}"))?,
            None => self.request(Method::POST, "api/templates")?,
        };
        Self::json(builder.json(template)).await
    }

    /// `GET /api/settings/sharing`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn sharing_settings(&self) -> Result<SharingSettings> {
        Self::json(self.request(Method::GET, "api/settings/sharing")?).await
    }

    /// `PUT /api/settings/sharing`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn save_sharing_settings(&self, settings: &SharingSettings) -> Result<()> {
        let builder = self
            .request(Method::PUT, "api/settings/sharing")?
            .json(settings);
        check(builder.send().await?).await?;
        Ok(())
    }
}

/// Turns a non-success response into [`Error::Api`].
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.trim().to_string()
        }
    });
    debug!("Backend answered {status}: {message}");
    Err(Error::api(status.as_u16(), message))
}

/// Extracts a message from a JSON error body.
///
/// Looks at `error`, `detail` and `message`. A FastAPI-style `detail` list
/// yields the `msg` of its first item.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "detail", "message"]
        .iter()
        .find_map(|key| match value.get(*key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string),
            Value::Object(inner) => inner
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let api = HttpApi::new("http://localhost:8000/backend", Duration::from_secs(5), None).unwrap();
        assert_eq!(api.base_url().as_str(), "http://localhost:8000/backend/");
        assert_eq!(
            api.base_url().join("api/logs").unwrap().as_str(),
            "http://localhost:8000/backend/api/logs"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpApi::new("localhost", Duration::from_secs(5), None),
            Err(Error::Url(_))
        ));
    }

    #[test]
    fn test_error_message_fields() {
        assert_eq!(error_message(r#"{"error": "boom"}"#).as_deref(), Some("boom"));
        assert_eq!(error_message(r#"{"detail": "Not found"}"#).as_deref(), Some("Not found"));
        assert_eq!(
            error_message(r#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#).as_deref(),
            Some("field required")
        );
        assert_eq!(
            error_message(r#"{"error": {"message": "nested"}}"#).as_deref(),
            Some("nested")
        );
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(r#"{"status": "bad"}"#), None);
    }

    #[test]
    fn test_records_response_shapes() {
        let page: RecordsResponse =
            serde_json::from_str(r#"{"items": [], "total": 0, "page": 1, "page_size": 25}"#).unwrap();
        assert!(matches!(page, RecordsResponse::Page(_)));
        let bare: RecordsResponse = serde_json::from_str("[]").unwrap();
        assert!(matches!(bare, RecordsResponse::Bare(_)));
    }

    #[test]
    fn test_affected_aliases() {
        let parsed: AffectedResponse = serde_json::from_str(r#"{"deleted": 3}"#).unwrap();
        assert_eq!(parsed.affected, Some(3));
        let parsed: AffectedResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.affected, None);
    }
}
