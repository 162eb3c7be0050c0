//! In-process stand-in for the backend.
//!
//! Generates a deterministic data set from a seed and keeps it in memory so
//! that resend and delete behave like the real service during demos and
//! tests. Every call sleeps for the configured latency first.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::records::{DeliveryStatus, EmailRecord, Page, RecordId, RecordQuery, StatusSummary};
use crate::sharing::SharingSettings;
use crate::template::{EmailTemplate, TemplateId};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 0x6d61_696c;

/// Number of generated records.
pub const DEFAULT_RECORD_COUNT: usize = 137;

/// Log lines kept in memory; the oldest are dropped first.
pub const LOG_CAPACITY: usize = 5_000;

const FIRST_NAMES: &[&str] = &[
    "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi", "ivan", "judy", "mallory",
    "niaj", "olivia", "peggy", "rupert", "sybil", "trent", "victor", "walter",
];

const DOMAINS: &[&str] = &["example.com", "example.org", "corp.example.net", "mail.test"];

const SUBJECTS: &[&str] = &[
    "Monthly statement",
    "Invoice",
    "Quarterly report",
    "Welcome aboard",
    "Password reset",
    "Shipping confirmation",
    "Meeting notes",
    "Contract for review",
];

const FILES: &[&str] = &[
    "statement.pdf",
    "invoice.pdf",
    "report.xlsx",
    "presentation.pptx",
    "archive.zip",
];

const FAILURES: &[&str] = &[
    "SMTP timeout after 30s",
    "Connection refused by smtp.example.net:587",
    "Authentication failed: 535 5.7.8",
    "Drive upload failed: quota exceeded",
];

const BOUNCES: &[&str] = &[
    "550 5.1.1 Mailbox does not exist",
    "552 5.2.2 Mailbox full",
    "554 5.7.1 Message rejected as spam",
];

#[derive(Debug)]
struct MockState {
    records: Vec<EmailRecord>,
    templates: Vec<EmailTemplate>,
    sharing: SharingSettings,
    log: VecDeque<String>,
    next_template_id: u64,
}

impl MockState {
    fn append_log(&mut self, line: String) {
        if self.log.len() >= LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}

/// Mock implementation of the backend API.
#[derive(Debug, Clone)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
    latency: Duration,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, Duration::ZERO)
    }
}

impl MockApi {
    /// Creates a mock with generated data anchored at the current time.
    #[must_use]
    pub fn new(seed: u64, latency: Duration) -> Self {
        Self::generate(seed, DEFAULT_RECORD_COUNT, Utc::now(), latency)
    }

    /// Creates a mock with `count` records, the newest created just before
    /// `anchor`.
    #[must_use]
    pub fn generate(seed: u64, count: usize, anchor: DateTime<Utc>, latency: Duration) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = generate_records(&mut rng, count, anchor);
        let log = generate_log(&mut rng, &records);
        Self::from_parts(records, log, latency)
    }

    /// Creates a mock serving the given records and no log history.
    #[must_use]
    pub fn with_records(records: Vec<EmailRecord>, latency: Duration) -> Self {
        Self::from_parts(records, Vec::new(), latency)
    }

    fn from_parts(records: Vec<EmailRecord>, log: Vec<String>, latency: Duration) -> Self {
        let templates = seed_templates();
        let next_template_id = templates
            .iter()
            .filter_map(|t| t.id)
            .map(|id| id.0)
            .max()
            .unwrap_or(0)
            + 1;
        let overflow = log.len().saturating_sub(LOG_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(MockState {
                records,
                templates,
                sharing: SharingSettings::default(),
                log: log.into_iter().skip(overflow).collect(),
                next_template_id,
            })),
            latency,
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Filters, sorts and pages the in-memory records.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the HTTP client.
    pub async fn list_records(&self, query: &RecordQuery) -> Result<Page<EmailRecord>> {
        self.delay().await;
        let state = self.state.lock().await;
        let page = query.apply(&state.records);
        debug!("mock list_records: {} of {}", page.items.len(), page.total);
        Ok(page)
    }

    /// Counts records per status.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the HTTP client.
    pub async fn status_summary(&self) -> Result<StatusSummary> {
        self.delay().await;
        let state = self.state.lock().await;
        Ok(StatusSummary::from_records(&state.records))
    }

    /// Moves failed and bounced records back to pending.
    ///
    /// Returns the number of records requeued; other ids are ignored.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the HTTP client.
    pub async fn resend(&self, ids: &[RecordId]) -> Result<usize> {
        self.delay().await;
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut requeued = Vec::new();
        for record in &mut state.records {
            if ids.contains(&record.id) && record.status.is_failure() {
                record.status = DeliveryStatus::Pending;
                record.retry_count += 1;
                record.error_message = None;
                record.sent_at = None;
                requeued.push((record.id, record.recipient.clone(), record.retry_count));
            }
        }
        for (id, recipient, attempt) in &requeued {
            let line = log_line(
                now,
                "INFO",
                &json!({
                    "message": "Resend requested",
                    "record_id": id.0,
                    "recipient": recipient,
                    "attempt": attempt,
                }),
            );
            state.append_log(line);
        }
        debug!("mock resend: {} of {} requeued", requeued.len(), ids.len());
        Ok(requeued.len())
    }

    /// Removes records.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the HTTP client.
    pub async fn delete_records(&self, ids: &[RecordId]) -> Result<usize> {
        self.delay().await;
        let mut state = self.state.lock().await;
        let before = state.records.len();
        state.records.retain(|r| !ids.contains(&r.id));
        let removed = before - state.records.len();
        debug!("mock delete: {removed} removed");
        Ok(removed)
    }

    /// Returns the last `lines` log lines.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the HTTP client.
    pub async fn fetch_logs(&self, lines: usize) -> Result<String> {
        self.delay().await;
        let state = self.state.lock().await;
        let start = state.log.len().saturating_sub(lines);
        Ok(state
            .log
            .iter()
            .skip(start)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Lists templates.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the HTTP client.
    pub async fn list_templates(&self) -> Result<Vec<EmailTemplate>> {
        self.delay().await;
        Ok(self.state.lock().await.templates.clone())
    }

    /// Creates or replaces a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an invalid template and
    /// [`Error::NotFound`] for an unknown id.
    pub async fn save_template(&self, template: &EmailTemplate) -> Result<EmailTemplate> {
        self.delay().await;
        if let Err(problems) = template.validate() {
            let messages: Vec<&str> = problems.iter().map(|p| p.message()).collect();
            return Err(Error::Validation(messages.join("; ")));
        }

        let mut state = self.state.lock().await;
        let mut saved = template.clone();
        saved.updated_at = Some(Utc::now());
        match saved.id {
            Some(id) => {
                let slot = state
                    .templates
                    .iter_mut()
                    .find(|t| t.id == Some(id))
                    .ok_or_else(|| Error::NotFound(format!("template {id}")))?;
                *slot = saved.clone();
            }
            None => {
                saved.id = Some(TemplateId(state.next_template_id));
                state.next_template_id += 1;
                state.templates.push(saved.clone());
            }
        }
        Ok(saved)
    }

    /// Returns the sharing settings.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the HTTP client.
    pub async fn sharing_settings(&self) -> Result<SharingSettings> {
        self.delay().await;
        Ok(self.state.lock().await.sharing.clone())
    }

    /// Replaces the sharing settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the settings are invalid.
    pub async fn save_sharing_settings(&self, settings: &SharingSettings) -> Result<()> {
        self.delay().await;
        if let Err(errors) = settings.validate() {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(Error::Validation(messages.join("; ")));
        }
        self.state.lock().await.sharing = settings.clone();
        Ok(())
    }
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn generate_records(rng: &mut StdRng, count: usize, anchor: DateTime<Utc>) -> Vec<EmailRecord> {
    let mut created_at = anchor;
    let mut records = Vec::with_capacity(count);
    for index in (1..=count).rev() {
        created_at -= ChronoDuration::minutes(rng.gen_range(3..90));
        let status = match rng.gen_range(0..100) {
            0..=49 => DeliveryStatus::Delivered,
            50..=69 => DeliveryStatus::Sent,
            70..=79 => DeliveryStatus::Pending,
            80..=91 => DeliveryStatus::Failed,
            _ => DeliveryStatus::Bounced,
        };
        let recipient = format!(
            "{}{}@{}",
            pick(rng, FIRST_NAMES),
            rng.gen_range(1..100),
            pick(rng, DOMAINS)
        );
        let file_name = rng.gen_bool(0.35).then(|| pick(rng, FILES).to_string());
        let file_url = file_name.as_ref().and_then(|_| {
            rng.gen_bool(0.4).then(|| {
                format!(
                    "https://drive.google.com/file/d/{:016x}/view",
                    rng.r#gen::<u64>()
                )
            })
        });
        let error_message = match status {
            DeliveryStatus::Failed => Some(pick(rng, FAILURES).to_string()),
            DeliveryStatus::Bounced => Some(pick(rng, BOUNCES).to_string()),
            _ => None,
        };
        let sent_at = (status != DeliveryStatus::Pending)
            .then(|| created_at + ChronoDuration::seconds(rng.gen_range(2..120)));
        let retry_count = if status.is_failure() {
            rng.gen_range(0..3)
        } else {
            0
        };

        records.push(EmailRecord {
            id: RecordId(index as u64),
            recipient,
            subject: format!("{} #{}", pick(rng, SUBJECTS), 1000 + index),
            status,
            created_at,
            sent_at,
            file_name,
            file_url,
            error_message,
            retry_count,
        });
    }
    records.reverse();
    records
}

fn log_line(at: DateTime<Utc>, level: &str, payload: &serde_json::Value) -> String {
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replacen('T', " ", 1)
        .trim_end_matches('Z')
        .replacen('.', ",", 1);
    format!("{timestamp} - {level} - {payload}")
}

fn generate_log(rng: &mut StdRng, records: &[EmailRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    for record in records {
        let base = json!({ "record_id": record.id.0, "recipient": record.recipient });
        let with = |message: &str| {
            let mut payload = base.clone();
            payload["message"] = json!(message);
            payload
        };

        lines.push(log_line(record.created_at, "INFO", &with("Email queued")));
        if rng.gen_bool(0.15) {
            lines.push(log_line(
                record.created_at,
                "DEBUG",
                &json!({ "message": "Worker heartbeat", "queue_depth": rng.gen_range(0..40) }),
            ));
        }
        let Some(sent_at) = record.sent_at else {
            continue;
        };
        if let Some(url) = &record.file_url {
            let mut payload = with("Attachment uploaded to Drive");
            payload["file_url"] = json!(url);
            lines.push(log_line(sent_at, "INFO", &payload));
        }
        match record.status {
            DeliveryStatus::Failed => {
                let mut payload = with("Email delivery failed");
                payload["error"] = json!(record.error_message);
                lines.push(log_line(sent_at, "ERROR", &payload));
                lines.push("Traceback (most recent call last):".to_string());
                lines.push("  File \"worker/send.py\", line 88, in deliver".to_string());
                lines.push(format!(
                    "smtplib.SMTPException: {}",
                    record.error_message.as_deref().unwrap_or("unknown error")
                ));
            }
            DeliveryStatus::Bounced => {
                let mut payload = with("Email bounced");
                payload["error"] = json!(record.error_message);
                lines.push(log_line(sent_at, "WARNING", &payload));
            }
            DeliveryStatus::Delivered => {
                lines.push(log_line(sent_at, "INFO", &with("Email delivered")));
            }
            _ => lines.push(log_line(sent_at, "INFO", &with("Email sent"))),
        }
    }
    lines
}

fn seed_templates() -> Vec<EmailTemplate> {
    vec![
        EmailTemplate {
            id: Some(TemplateId(1)),
            body_html: "<h2>Your documents are ready</h2>\
                        <p>Hello {{name}},</p>\
                        <p>Please find your <strong>{{document}}</strong> attached. \
                        Larger files are shared through <a href=\"https://drive.google.com\">Google Drive</a>.</p>\
                        <p>Regards,<br>The {{company}} team</p>"
                .to_string(),
            ..EmailTemplate::new("Document delivery", "{{document}} for {{name}}")
        },
        EmailTemplate {
            id: Some(TemplateId(2)),
            body_html: "<p>Hi {{name}},</p>\
                        <p>We could not deliver your last message. Reasons may include:</p>\
                        <ul><li>a full mailbox</li><li>an address that no longer exists</li></ul>\
                        <p><em>This message was sent automatically.</em></p>"
                .to_string(),
            ..EmailTemplate::new("Delivery failure notice", "We could not reach you, {{name}}")
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logs::{LogLevel, parse_log};
    use crate::sharing::SharingOption;

    fn mock() -> MockApi {
        let anchor = crate::dates::parse_timestamp("2024-05-01T12:00:00Z").unwrap();
        MockApi::generate(42, 60, anchor, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_generation_is_deterministic() {
        let a = mock().list_records(&RecordQuery::with_page_size(60)).await.unwrap();
        let b = mock().list_records(&RecordQuery::with_page_size(60)).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total, 60);
    }

    #[tokio::test]
    async fn test_summary_matches_records() {
        let api = mock();
        let summary = api.status_summary().await.unwrap();
        assert_eq!(summary.total, 60);
        let failed = api
            .list_records(&RecordQuery::default().with_status(Some(DeliveryStatus::Failed)))
            .await
            .unwrap();
        assert_eq!(failed.total as u64, summary.failed);
    }

    #[tokio::test]
    async fn test_resend_requeues_only_failures() {
        let api = MockApi::with_records(
            vec![
                record(1, DeliveryStatus::Failed),
                record(2, DeliveryStatus::Delivered),
                record(3, DeliveryStatus::Bounced),
            ],
            Duration::ZERO,
        );
        let count = api
            .resend(&[RecordId(1), RecordId(2), RecordId(3), RecordId(99)])
            .await
            .unwrap();
        assert_eq!(count, 2);

        let summary = api.status_summary().await.unwrap();
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.delivered, 1);

        let page = api.list_records(&RecordQuery::default()).await.unwrap();
        let first = page.items.iter().find(|r| r.id == RecordId(1)).unwrap();
        assert_eq!(first.retry_count, 1);
        assert!(first.error_message.is_none());

        let log = api.fetch_logs(10).await.unwrap();
        assert_eq!(parse_log(&log).len(), 2);
    }

    #[tokio::test]
    async fn test_log_history_is_capped() {
        let history = vec!["old line".to_string(); LOG_CAPACITY + 10];
        let api = MockApi::from_parts(
            vec![record(1, DeliveryStatus::Failed)],
            history,
            Duration::ZERO,
        );
        assert_eq!(api.fetch_logs(usize::MAX).await.unwrap().lines().count(), LOG_CAPACITY);

        api.resend(&[RecordId(1)]).await.unwrap();
        let log = api.fetch_logs(usize::MAX).await.unwrap();
        assert_eq!(log.lines().count(), LOG_CAPACITY);
        assert!(log.lines().last().unwrap().contains("Resend requested"));
    }

    #[tokio::test]
    async fn test_delete_removes() {
        let api = mock();
        assert_eq!(api.delete_records(&[RecordId(1), RecordId(2)]).await.unwrap(), 2);
        assert_eq!(api.delete_records(&[RecordId(1)]).await.unwrap(), 0);
        assert_eq!(api.status_summary().await.unwrap().total, 58);
    }

    #[tokio::test]
    async fn test_generated_log_parses() {
        let api = mock();
        let text = api.fetch_logs(10_000).await.unwrap();
        let entries = parse_log(&text);
        assert!(entries.len() >= 60);
        assert!(entries.iter().all(|e| e.timestamp.is_some()));
        assert!(entries.iter().all(|e| !matches!(e.level, LogLevel::Other(_))));
        let failures = entries.iter().filter(|e| e.level == LogLevel::Error).count() as u64;
        assert_eq!(failures, api.status_summary().await.unwrap().failed);
        assert!(
            entries
                .iter()
                .filter(|e| e.level == LogLevel::Error)
                .all(|e| e.continuation.len() == 3)
        );

        let tail = api.fetch_logs(5).await.unwrap();
        assert_eq!(tail.lines().count(), 5);
    }

    #[tokio::test]
    async fn test_save_template() {
        let api = mock();
        let templates = api.list_templates().await.unwrap();
        assert_eq!(templates.len(), 2);

        let created = api
            .save_template(&EmailTemplate::new("Reminder", "Don't forget {{thing}}"))
            .await
            .unwrap();
        assert_eq!(created.id, Some(TemplateId(3)));
        assert!(created.updated_at.is_some());

        let mut edited = templates[0].clone();
        edited.subject = "Changed".into();
        api.save_template(&edited).await.unwrap();
        let templates = api.list_templates().await.unwrap();
        assert_eq!(templates.len(), 3);
        assert_eq!(templates[0].subject, "Changed");

        let missing = EmailTemplate {
            id: Some(TemplateId(77)),
            ..EmailTemplate::new("x", "y")
        };
        assert!(matches!(api.save_template(&missing).await, Err(Error::NotFound(_))));
        assert!(matches!(
            api.save_template(&EmailTemplate::new("", "")).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_sharing_settings_round_trip() {
        let api = mock();
        let mut settings = api.sharing_settings().await.unwrap();
        assert_eq!(settings, SharingSettings::default());

        settings.option = SharingOption::Specific;
        assert!(matches!(
            api.save_sharing_settings(&settings).await,
            Err(Error::Validation(_))
        ));
        settings.add_email("ops@example.com").unwrap();
        api.save_sharing_settings(&settings).await.unwrap();
        assert_eq!(api.sharing_settings().await.unwrap(), settings);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let api = MockApi::with_records(Vec::new(), Duration::from_millis(250));
        let started = tokio::time::Instant::now();
        api.status_summary().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[test]
    fn test_usable_without_async_test_harness() {
        let api = mock();
        let summary = tokio_test::block_on(api.status_summary()).unwrap();
        assert_eq!(summary.total, 60);
        let removed = tokio_test::block_on(api.delete_records(&[RecordId(3)])).unwrap();
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_log_line_format() {
        let at = crate::dates::parse_timestamp("2024-05-01T10:22:33.123Z").unwrap();
        assert_eq!(
            log_line(at, "INFO", &json!({"message": "x"})),
            r#"2024-05-01 10:22:33,123 - INFO - {"message":"x"}"#
        );
    }

    fn record(id: u64, status: DeliveryStatus) -> EmailRecord {
        EmailRecord {
            id: RecordId(id),
            recipient: format!("user{id}@example.com"),
            subject: "Report".into(),
            status,
            created_at: Utc::now(),
            sent_at: Some(Utc::now()),
            file_name: None,
            file_url: None,
            error_message: status.is_failure().then(|| "SMTP timeout".to_string()),
            retry_count: 0,
        }
    }
}
