//! Field-code to cell-value projection.
//!
//! Every exportable field code maps to one accessor over [`Provider`],
//! registered once in a static table. A code that is in the registry but
//! has no accessor (header/summary-level codes, or codes added to the
//! registry ahead of a release) projects an empty cell — an export never
//! fails because of an unmapped column.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{AvailableField, Provider};
use crate::report::ReportPayload;

/// One spreadsheet cell, format-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Render for text-oriented outputs. Whole numbers drop the
    /// fractional part.
    pub fn as_display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
        }
    }
}

/// The column-ordered projection of one report: a header row of display
/// names plus one row of cells per provider.
#[derive(Debug, Clone)]
pub struct TabularProjection {
    pub header_row: Vec<String>,
    pub data_rows: Vec<Vec<CellValue>>,
}

type Accessor = fn(&Provider) -> CellValue;

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn opt_text(value: &Option<String>) -> CellValue {
    match value {
        Some(s) => CellValue::Text(s.clone()),
        None => CellValue::Empty,
    }
}

fn yes_no(value: bool) -> CellValue {
    CellValue::Text(if value { "Yes" } else { "No" }.to_string())
}

/// The closed field-code accessor table. Booleans label as Yes/No, dates
/// render `%Y-%m-%d` and audit timestamps `%Y-%m-%d %H:%M:%S` — both
/// fixed, non-localized.
static ACCESSORS: LazyLock<HashMap<&'static str, Accessor>> = LazyLock::new(|| {
    let mut map: HashMap<&'static str, Accessor> = HashMap::new();
    map.insert("id", |p| CellValue::Number(p.id as f64));
    map.insert("provider_code", |p| text(&p.provider_code));
    map.insert("name_local", |p| text(&p.name_local));
    map.insert("name_en", |p| opt_text(&p.name_en));
    map.insert("provider_type", |p| text(&p.provider_type));
    map.insert("business_type", |p| opt_text(&p.business_type));
    map.insert("register_status", |p| opt_text(&p.register_status));
    map.insert("provider_status", |p| text(&p.provider_status));
    map.insert("province", |p| text(&p.province));
    map.insert("district", |p| opt_text(&p.district));
    map.insert("sub_district", |p| opt_text(&p.sub_district));
    map.insert("post_code", |p| opt_text(&p.post_code));
    map.insert("region", |p| opt_text(&p.region));
    map.insert("country", |p| opt_text(&p.country));
    map.insert("general_phone_no", |p| opt_text(&p.general_phone_no));
    map.insert("direct_phone_no", |p| opt_text(&p.direct_phone_no));
    map.insert("email", |p| opt_text(&p.email));
    map.insert("is_tpa_network", |p| yes_no(p.is_tpa_network));
    map.insert("has_incident", |p| yes_no(p.has_incident));
    map.insert("created_at", |p| {
        CellValue::Text(p.created_at.format("%Y-%m-%d").to_string())
    });
    map.insert("updated_at", |p| {
        CellValue::Text(p.updated_at.format("%Y-%m-%d %H:%M:%S").to_string())
    });
    map
});

/// Project one provider attribute. Unmapped codes yield an empty cell.
pub fn cell_value(provider: &Provider, field_code: &str) -> CellValue {
    match ACCESSORS.get(field_code) {
        Some(accessor) => accessor(provider),
        None => CellValue::Empty,
    }
}

/// Build the 2-D projection for the given (already resolved) field list.
/// Column order is exactly the field order handed in.
pub fn project(payload: &ReportPayload, fields: &[AvailableField]) -> TabularProjection {
    let header_row = fields.iter().map(|f| f.field_name_en.clone()).collect();
    let data_rows = payload
        .providers
        .iter()
        .map(|provider| {
            fields
                .iter()
                .map(|f| cell_value(provider, &f.field_code))
                .collect()
        })
        .collect();

    TabularProjection {
        header_row,
        data_rows,
    }
}
