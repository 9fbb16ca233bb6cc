//! Schedule endpoints: CRUD, active listing and the manual run-now stub.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{RunScheduleOutcome, Schedule, ScheduleDraft};
use crate::schedules;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ScheduleListQuery {
    /// `?active=true` narrows to runnable schedules (active, in window),
    /// ordered by next run time.
    pub active: bool,
}

/// `GET /schedules`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScheduleListQuery>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    let conn = ctx.open_db()?;
    let schedules = if query.active {
        schedules::list_active(&conn)?
    } else {
        schedules::list(&conn)?
    };
    Ok(Json(schedules))
}

/// `GET /schedules/:id`
pub async fn get_one(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Schedule>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(schedules::get(&conn, id)?))
}

/// `POST /schedules` — the template reference must resolve to a live
/// template or the create fails.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(draft): Json<ScheduleDraft>,
) -> Result<(StatusCode, Json<Schedule>), ApiError> {
    let conn = ctx.open_db()?;
    // TODO: take the author from the authenticated principal once the
    // auth boundary forwards one.
    let schedule = schedules::create(&conn, &draft, "system")?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// `PUT /schedules/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(draft): Json<ScheduleDraft>,
) -> Result<Json<Schedule>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(schedules::update(&conn, id, &draft, "system")?))
}

/// `DELETE /schedules/:id` — soft delete.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    schedules::delete(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /schedules/:id/run` — manual run: stamps `last_run_at` and
/// records the attempt. No report generation or mail happens here.
pub async fn run(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<RunScheduleOutcome>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(schedules::run_now(&conn, id)?))
}
