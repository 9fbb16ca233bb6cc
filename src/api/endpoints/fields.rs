//! Field-registry endpoints: listing, validation and admin CRUD.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::fields;
use crate::models::{AvailableField, FieldCategory, FieldDraft, FieldValidation, ValidationError};

/// `GET /fields` — all active fields, grouped by category and sort order.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<AvailableField>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(fields::list_active(&conn)?))
}

/// `GET /fields/category/:category` — active fields in one category.
/// An unknown category is a client error, not an empty list.
pub async fn by_category(
    State(ctx): State<ApiContext>,
    Path(category): Path<String>,
) -> Result<Json<Vec<AvailableField>>, ApiError> {
    let category = FieldCategory::from_str(&category)
        .map_err(|_| ValidationError::InvalidCategory(category))?;
    let conn = ctx.open_db()?;
    Ok(Json(fields::list_by_category(&conn, category)?))
}

/// `GET /fields/categories` — distinct categories with active entries.
pub async fn categories(State(ctx): State<ApiContext>) -> Result<Json<Vec<String>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(fields::list_categories(&conn)?))
}

#[derive(Deserialize)]
pub struct ValidateFieldsRequest {
    pub field_codes: Vec<String>,
}

#[derive(Serialize)]
pub struct ValidateFieldsResponse {
    pub results: Vec<FieldValidation>,
    pub summary: ValidationSummary,
}

#[derive(Serialize)]
pub struct ValidationSummary {
    pub total_fields: usize,
    pub valid_fields: usize,
    pub invalid_fields: usize,
}

/// `POST /fields/validate` — per-code verdicts plus a tally.
pub async fn validate(
    State(ctx): State<ApiContext>,
    Json(req): Json<ValidateFieldsRequest>,
) -> Result<Json<ValidateFieldsResponse>, ApiError> {
    if req.field_codes.is_empty() {
        return Err(ValidationError::MissingField {
            field: "field_codes",
        }
        .into());
    }

    let conn = ctx.open_db()?;
    let results = fields::validate(&conn, &req.field_codes)?;
    let valid_fields = results.iter().filter(|r| r.is_valid).count();

    Ok(Json(ValidateFieldsResponse {
        summary: ValidationSummary {
            total_fields: results.len(),
            valid_fields,
            invalid_fields: results.len() - valid_fields,
        },
        results,
    }))
}

/// `POST /fields` — register a new exportable field.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(draft): Json<FieldDraft>,
) -> Result<(StatusCode, Json<AvailableField>), ApiError> {
    let conn = ctx.open_db()?;
    Ok((StatusCode::CREATED, Json(fields::create(&conn, &draft)?)))
}

/// `PUT /fields/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(draft): Json<FieldDraft>,
) -> Result<Json<AvailableField>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(fields::update(&conn, id, &draft)?))
}

/// `DELETE /fields/:id` — deactivates; registry entries are never
/// hard-deleted while templates may still reference them.
pub async fn deactivate(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    fields::deactivate(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}
