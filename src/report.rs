//! Report assembly: composes search output, the summary aggregate and
//! header metadata into one payload, then hands it to the export layer.
//!
//! No row data is transformed here. A failure in any collaborator aborts
//! the whole operation — a payload is never partially built.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;
use crate::export::{self, ExportError, ExportFormat, RenderedReport};
use crate::models::{Provider, ProviderFilter, ProviderSummary};
use crate::{fields, providers};

/// Report request shared by generate and export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportRequest {
    pub search_params: ProviderFilter,
    pub template_id: Option<i64>,
    pub format_type: String,
    pub custom_fields: Vec<String>,
}

/// Report-level metadata echoed to consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ReportHeader {
    pub generated_at: NaiveDateTime,
    pub criteria: ProviderFilter,
    pub total_records: i64,
    pub template_id: Option<i64>,
    pub format_type: String,
}

/// The ephemeral per-request report structure. Built here, consumed by
/// the export mapper, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub header: ReportHeader,
    pub summary: ProviderSummary,
    pub providers: Vec<Provider>,
    pub total: i64,
}

/// Run the search and summary for the request and wrap them with header
/// metadata. The search applies its usual pagination, so `providers`
/// holds the requested page while `total` counts every match.
pub fn generate(conn: &Connection, request: &ReportRequest) -> Result<ReportPayload, DatabaseError> {
    let (rows, total) = providers::search(conn, &request.search_params)?;
    let summary = providers::summary(conn, &request.search_params)?;

    Ok(ReportPayload {
        header: ReportHeader {
            generated_at: chrono::Utc::now().naive_utc(),
            criteria: request.search_params.clone(),
            total_records: total,
            template_id: request.template_id,
            format_type: request.format_type.clone(),
        },
        summary,
        providers: rows,
        total,
    })
}

/// Generate the payload and render it in the requested format.
///
/// Column choice: an explicit `custom_fields` list resolves leniently
/// through the registry (unknown codes dropped); otherwise every active
/// registry field is exported.
pub fn export_report(
    conn: &Connection,
    request: &ReportRequest,
) -> Result<RenderedReport, ExportError> {
    let payload = generate(conn, request)?;

    let fields = if request.custom_fields.is_empty() {
        fields::list_active(conn)?
    } else {
        fields::resolve_for_export(conn, &request.custom_fields)?
    };

    export::render(&payload, &fields, ExportFormat::parse(&request.format_type))
}
