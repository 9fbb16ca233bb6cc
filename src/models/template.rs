use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A named, validated bundle of field codes defining one report shape.
/// Field lists persist in caller order, duplicates intact. Templates are
/// soft-deleted; `is_standard` marks system defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub template_name: String,
    pub is_standard: bool,
    pub description: Option<String>,
    pub header_fields: Vec<String>,
    pub data_fields: Vec<String>,
    pub summary_fields: Vec<String>,
    pub field_positions: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub created_by: String,
    pub updated_by: Option<String>,
}

/// Template payload for create and update. All three field buckets are
/// validated against the registry before anything is written.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDraft {
    pub template_name: String,
    #[serde(default)]
    pub is_standard: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub header_fields: Vec<String>,
    pub data_fields: Vec<String>,
    #[serde(default)]
    pub summary_fields: Vec<String>,
    #[serde(default)]
    pub field_positions: Option<String>,
}
