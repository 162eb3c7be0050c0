//! Email record data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for an email record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery status of a single send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Queued, not yet handed to the mail server.
    #[default]
    Pending,
    /// Accepted by the mail server.
    Sent,
    /// Confirmed delivered to the recipient.
    Delivered,
    /// Send attempt failed.
    Failed,
    /// Recipient server bounced the message.
    Bounced,
}

impl DeliveryStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Sent,
        Self::Delivered,
        Self::Failed,
        Self::Bounced,
    ];

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Bounced => "bounced",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Sent => "Sent",
            Self::Delivered => "Delivered",
            Self::Failed => "Failed",
            Self::Bounced => "Bounced",
        }
    }

    /// Parses a status string leniently.
    ///
    /// Unknown values map to [`DeliveryStatus::Pending`].
    #[must_use]
    pub fn from_str_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "sent" | "success" => Self::Sent,
            "delivered" => Self::Delivered,
            "failed" | "error" => Self::Failed,
            "bounced" => Self::Bounced,
            _ => Self::Pending,
        }
    }

    /// Returns true if this status counts as a delivery failure.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Bounced)
    }

    /// Returns true if this status counts as a successful send.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Sent | Self::Delivered)
    }
}

impl<'de> Deserialize<'de> for DeliveryStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_str_lenient(&s))
    }
}

/// One email send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Record identifier.
    pub id: RecordId,
    /// Recipient address.
    pub recipient: String,
    /// Message subject.
    pub subject: String,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// When the record was created (queued).
    pub created_at: DateTime<Utc>,
    /// When the message left the queue.
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    /// Name of the attached file.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Drive link when the file was uploaded instead of attached.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Failure reason reported by the backend.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Number of resend attempts.
    #[serde(default)]
    pub retry_count: u32,
}

impl EmailRecord {
    /// Returns true if the record matches a lowercase search needle.
    #[must_use]
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        self.recipient.to_lowercase().contains(needle_lower)
            || self.subject.to_lowercase().contains(needle_lower)
            || self
                .file_name
                .as_ref()
                .is_some_and(|f| f.to_lowercase().contains(needle_lower))
    }

    /// Returns true if the attached file went through Drive.
    #[must_use]
    pub const fn is_drive_upload(&self) -> bool {
        self.file_url.is_some()
    }
}

/// Aggregated delivery counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Total records.
    pub total: u64,
    /// Pending records.
    #[serde(default)]
    pub pending: u64,
    /// Sent records.
    #[serde(default)]
    pub sent: u64,
    /// Delivered records.
    #[serde(default)]
    pub delivered: u64,
    /// Failed records.
    #[serde(default)]
    pub failed: u64,
    /// Bounced records.
    #[serde(default)]
    pub bounced: u64,
}

impl StatusSummary {
    /// Computes the summary client-side.
    #[must_use]
    pub fn from_records(records: &[EmailRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.total += 1;
            *summary.count_mut(record.status) += 1;
        }
        summary
    }

    /// Returns the count for a status.
    #[must_use]
    pub const fn count(&self, status: DeliveryStatus) -> u64 {
        match status {
            DeliveryStatus::Pending => self.pending,
            DeliveryStatus::Sent => self.sent,
            DeliveryStatus::Delivered => self.delivered,
            DeliveryStatus::Failed => self.failed,
            DeliveryStatus::Bounced => self.bounced,
        }
    }

    const fn count_mut(&mut self, status: DeliveryStatus) -> &mut u64 {
        match status {
            DeliveryStatus::Pending => &mut self.pending,
            DeliveryStatus::Sent => &mut self.sent,
            DeliveryStatus::Delivered => &mut self.delivered,
            DeliveryStatus::Failed => &mut self.failed,
            DeliveryStatus::Bounced => &mut self.bounced,
        }
    }

    /// Failed plus bounced.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.failed + self.bounced
    }

    /// Percentage of records that were sent or delivered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.sent + self.delivered) as f64 / self.total as f64 * 100.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(id: u64, status: DeliveryStatus) -> EmailRecord {
        EmailRecord {
            id: RecordId(id),
            recipient: format!("user{id}@example.com"),
            subject: "Quarterly report".to_string(),
            status,
            created_at: Utc::now(),
            sent_at: None,
            file_name: Some("report.pdf".to_string()),
            file_url: None,
            error_message: None,
            retry_count: 0,
        }
    }

    #[test]
    fn test_lenient_status_parsing() {
        assert_eq!(DeliveryStatus::from_str_lenient("SENT"), DeliveryStatus::Sent);
        assert_eq!(
            DeliveryStatus::from_str_lenient("error"),
            DeliveryStatus::Failed
        );
        assert_eq!(
            DeliveryStatus::from_str_lenient("queued"),
            DeliveryStatus::Pending
        );
    }

    #[test]
    fn test_record_deserializes_with_missing_optionals() {
        let json = r#"{
            "id": 42,
            "recipient": "a@example.com",
            "subject": "Hi",
            "status": "weird",
            "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let record: EmailRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId(42));
        assert_eq!(record.status, DeliveryStatus::Pending);
        assert!(record.file_name.is_none());
        assert_eq!(record.retry_count, 0);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&DeliveryStatus::Bounced).unwrap();
        assert_eq!(json, "\"bounced\"");
    }

    #[test]
    fn test_drive_upload_follows_file_url() {
        let mut r = record(3, DeliveryStatus::Delivered);
        assert!(!r.is_drive_upload());
        r.file_url = Some("https://drive.google.com/file/d/abc".to_string());
        assert!(r.is_drive_upload());
    }

    #[test]
    fn test_matches_search() {
        let r = record(1, DeliveryStatus::Sent);
        assert!(r.matches_search(""));
        assert!(r.matches_search("user1"));
        assert!(r.matches_search("quarterly"));
        assert!(r.matches_search("report.pdf"));
        assert!(!r.matches_search("invoice"));
    }

    #[test]
    fn test_summary_from_records() {
        let records = vec![
            record(1, DeliveryStatus::Sent),
            record(2, DeliveryStatus::Delivered),
            record(3, DeliveryStatus::Failed),
            record(4, DeliveryStatus::Bounced),
        ];
        let summary = StatusSummary::from_records(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.failures(), 2);
        assert_eq!(summary.count(DeliveryStatus::Pending), 0);
        assert!((summary.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_empty() {
        assert!(StatusSummary::default().success_rate().abs() < f64::EPSILON);
    }
}
