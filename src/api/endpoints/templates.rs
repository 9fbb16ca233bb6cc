//! Template endpoints. Create and update validate all field codes
//! against the registry before writing; failures name the offending code.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Template, TemplateDraft};
use crate::templates;

/// `GET /templates` — not-deleted templates, standard ones first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Template>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(templates::list(&conn)?))
}

/// `GET /templates/:id`
pub async fn get_one(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Template>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(templates::get(&conn, id)?))
}

/// `POST /templates`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(draft): Json<TemplateDraft>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    let conn = ctx.open_db()?;
    let template = templates::create(&conn, &draft, "system")?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// `PUT /templates/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(draft): Json<TemplateDraft>,
) -> Result<Json<Template>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(templates::update(&conn, id, &draft, "system")?))
}

/// `DELETE /templates/:id` — soft delete.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    templates::delete(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}
