use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::SendStatus;

/// Append-only record of one report-send attempt. Status may be updated
/// after the fact; rows are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentReportLog {
    pub id: i64,
    pub template_id: i64,
    pub schedule_id: Option<i64>,
    pub recipients: String,
    pub subject: Option<String>,
    pub file_name: Option<String>,
    pub file_size_kb: Option<i64>,
    pub export_format: Option<String>,
    pub total_records: Option<i64>,
    pub sent_at: NaiveDateTime,
    pub status: SendStatus,
    pub error_message: Option<String>,
    pub retry_count: i64,
    pub execution_time_ms: Option<i64>,
    /// Joined for listings.
    pub template_name: Option<String>,
    pub schedule_name: Option<String>,
}

/// Payload for recording a send attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct LogDraft {
    pub template_id: i64,
    #[serde(default)]
    pub schedule_id: Option<i64>,
    pub recipients: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size_kb: Option<i64>,
    #[serde(default)]
    pub export_format: Option<String>,
    #[serde(default)]
    pub total_records: Option<i64>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub retry_count: i64,
    #[serde(default)]
    pub execution_time_ms: Option<i64>,
}
