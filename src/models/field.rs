use serde::{Deserialize, Serialize};

use super::enums::{FieldCategory, FieldType};

/// One field-registry entry. `field_code` is the stable identifier report
/// templates and exports refer to; inactive entries are kept but excluded
/// from validation and listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableField {
    pub id: i64,
    pub field_code: String,
    pub field_name_local: String,
    pub field_name_en: String,
    pub field_type: FieldType,
    pub field_category: FieldCategory,
    pub data_source: Option<String>,
    pub format_example: Option<String>,
    pub is_required: bool,
    pub is_active: bool,
    pub sort_order: i64,
    pub description: Option<String>,
}

/// Per-code validation verdict. Every input code gets one entry, in input
/// order, duplicates included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValidation {
    pub field_code: String,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Admin-facing registry entry payload (create/update).
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDraft {
    pub field_code: Option<String>,
    pub field_name_local: String,
    pub field_name_en: String,
    pub field_type: String,
    pub field_category: String,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub format_example: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}
