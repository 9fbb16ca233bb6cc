//! Report endpoints: JSON payload generation and file export.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::report::{self, ReportPayload, ReportRequest};

/// `POST /reports/generate` — assemble and return the report payload.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportPayload>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(report::generate(&conn, &request)?))
}

/// `POST /reports/export` — render the report and ship it as an
/// attachment. `pdf`/`word` are rejected with 501; an empty format
/// string means excel.
pub async fn export(
    State(ctx): State<ApiContext>,
    Json(request): Json<ReportRequest>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    let rendered = report::export_report(&conn, &request)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, rendered.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", rendered.file_name),
            ),
        ],
        rendered.bytes,
    )
        .into_response())
}
