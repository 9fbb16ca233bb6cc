//! Sent-report-log endpoints.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PaginatedResponse};
use crate::models::{LogDraft, LogFilter, SendStatus, SentReportLog, ValidationError};
use crate::report_logs;

/// `GET /logs` — filtered, paginated send history.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(filter): Query<LogFilter>,
) -> Result<Json<PaginatedResponse<SentReportLog>>, ApiError> {
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        SendStatus::from_str(status)
            .map_err(|_| ValidationError::InvalidStatus(status.to_string()))?;
    }

    let conn = ctx.open_db()?;
    let (logs, total) = report_logs::search(&conn, &filter)?;
    Ok(Json(PaginatedResponse::new(
        logs,
        total,
        filter.page(),
        filter.limit(),
    )))
}

/// `GET /logs/:id`
pub async fn get_one(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<SentReportLog>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(report_logs::get(&conn, id)?))
}

/// `POST /logs` — record a send attempt.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(draft): Json<LogDraft>,
) -> Result<(StatusCode, Json<SentReportLog>), ApiError> {
    let conn = ctx.open_db()?;
    let log = report_logs::create(&conn, &draft)?;
    Ok((StatusCode::CREATED, Json(log)))
}
