use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A healthcare facility record. `provider_code` is the stable business
/// identifier; the row id is internal. Providers are hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: i64,
    pub provider_code: String,
    pub title_local: Option<String>,
    pub name_local: String,
    pub title_en: Option<String>,
    pub name_en: Option<String>,
    pub provider_type: String,
    pub register_status: Option<String>,
    pub business_type: Option<String>,
    pub bed_size: Option<String>,
    pub eligibility_method: Option<String>,
    pub province: String,
    pub region: Option<String>,
    pub country: Option<String>,
    pub tax_id: Option<String>,
    pub wh_tax_percent: Option<f64>,
    pub exempt_percent: Option<f64>,
    pub opening_time: Option<String>,
    pub provider_status: String,
    pub building_no: Option<String>,
    pub village_no: Option<String>,
    pub road: Option<String>,
    pub sub_district: Option<String>,
    pub district: Option<String>,
    pub post_code: Option<String>,
    pub general_phone_no: Option<String>,
    pub direct_phone_no: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<String>,
    pub payee_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_type: Option<String>,
    pub bank_branch_name: Option<String>,
    pub bank_name: Option<String>,
    pub is_tpa_network: bool,
    pub has_incident: bool,
    pub discount_categories: Vec<String>,
    pub pricing_categories: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Editable provider attributes, shared by create and update. Update is a
/// full overwrite of this set; `provider_code` is fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderDraft {
    pub title_local: Option<String>,
    pub name_local: String,
    pub title_en: Option<String>,
    pub name_en: Option<String>,
    pub provider_type: String,
    pub register_status: Option<String>,
    pub business_type: Option<String>,
    pub bed_size: Option<String>,
    pub eligibility_method: Option<String>,
    pub province: String,
    pub region: Option<String>,
    pub country: Option<String>,
    pub tax_id: Option<String>,
    pub wh_tax_percent: Option<f64>,
    pub exempt_percent: Option<f64>,
    pub opening_time: Option<String>,
    pub provider_status: Option<String>,
    pub building_no: Option<String>,
    pub village_no: Option<String>,
    pub road: Option<String>,
    pub sub_district: Option<String>,
    pub district: Option<String>,
    pub post_code: Option<String>,
    pub general_phone_no: Option<String>,
    pub direct_phone_no: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<String>,
    pub payee_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_type: Option<String>,
    pub bank_branch_name: Option<String>,
    pub bank_name: Option<String>,
    pub is_tpa_network: bool,
    pub has_incident: bool,
    pub discount_categories: Vec<String>,
    pub pricing_categories: Vec<String>,
}

/// Aggregate counts for the summary endpoint. The `type` key carries the
/// fixed owner label upstream consumers expect on every summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    #[serde(rename = "type")]
    pub summary_type: String,
    pub hospital: i64,
    pub clinic: i64,
    pub grand_total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

/// Whole-table statistics (unfiltered).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStats {
    pub total_providers: i64,
    pub total_hospitals: i64,
    pub total_clinics: i64,
    pub tpa_network_providers: i64,
    pub active_providers: i64,
    pub inactive_providers: i64,
}
