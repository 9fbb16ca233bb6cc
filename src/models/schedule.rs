use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::Frequency;

/// A recurring report job definition. Pure data management: nothing in
/// this process computes `next_run_at` or dispatches mail — execution
/// belongs to an external runner that reads `list_active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub schedule_name: String,
    pub template_id: i64,
    pub email_to: String,
    pub email_cc: Option<String>,
    pub email_bcc: Option<String>,
    pub frequency: Frequency,
    pub schedule_days: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: String,
    pub timezone: String,
    pub is_active: bool,
    pub last_run_at: Option<NaiveDateTime>,
    pub next_run_at: Option<NaiveDateTime>,
    pub search_criteria: serde_json::Value,
    pub export_format: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub created_by: String,
    pub updated_by: Option<String>,
    /// Joined from the template row for listings.
    pub template_name: Option<String>,
}

/// Schedule payload for create and update. `template_id` must resolve to
/// a live template; `frequency` and `email_to` are validated before write.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDraft {
    pub schedule_name: String,
    pub template_id: i64,
    pub email_to: String,
    #[serde(default)]
    pub email_cc: Option<String>,
    #[serde(default)]
    pub email_bcc: Option<String>,
    pub frequency: String,
    #[serde(default)]
    pub schedule_days: Vec<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub start_time: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "default_criteria")]
    pub search_criteria: serde_json::Value,
    #[serde(default = "default_format")]
    pub export_format: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_active() -> bool {
    true
}

fn default_criteria() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn default_format() -> String {
    "excel".to_string()
}

/// Response for the manual run-now operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunScheduleOutcome {
    pub message: String,
    pub executed_at: NaiveDateTime,
    pub recipients: String,
    pub record_count: i64,
    pub file_size: String,
    pub status: String,
}
