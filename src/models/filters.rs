use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Provider search filter. Every field is optional; absent or empty
/// fields contribute no predicate. Results always order by creation
/// timestamp, newest first — `sort_by` is accepted for wire compatibility
/// but not applied (see DESIGN.md).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderFilter {
    pub provider_name: Option<String>,
    pub province_name: Option<String>,
    pub provider_type: Option<String>,
    pub business_type: Option<String>,
    pub is_tpa_network: Option<bool>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProviderFilter {
    /// 1-based page, defaulting to 1.
    pub fn page(&self) -> u32 {
        match self.page {
            Some(0) | None => 1,
            Some(p) => p,
        }
    }

    /// Page size, defaulting to 10.
    pub fn limit(&self) -> u32 {
        match self.limit {
            Some(0) | None => 10,
            Some(l) => l,
        }
    }
}

/// Sent-report-log search filter; same conventions as [`ProviderFilter`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFilter {
    pub template_id: Option<i64>,
    pub schedule_id: Option<i64>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl LogFilter {
    pub fn page(&self) -> u32 {
        match self.page {
            Some(0) | None => 1,
            Some(p) => p,
        }
    }

    pub fn limit(&self) -> u32 {
        match self.limit {
            Some(0) | None => 10,
            Some(l) => l,
        }
    }
}

/// Rows LIMIT/OFFSET for a 1-based page. A page of 0 clamps to offset 0.
pub fn page_offset(page: u32, limit: u32) -> i64 {
    ((page as i64) - 1).max(0) * limit as i64
}
