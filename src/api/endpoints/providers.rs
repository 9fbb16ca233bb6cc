//! Provider endpoints: filtered search, aggregates and CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PaginatedResponse};
use crate::models::{Provider, ProviderDraft, ProviderFilter, ProviderStats, ProviderSummary};
use crate::providers;

/// `GET /providers/search` — filtered, paginated provider listing.
pub async fn search(
    State(ctx): State<ApiContext>,
    Query(filter): Query<ProviderFilter>,
) -> Result<Json<PaginatedResponse<Provider>>, ApiError> {
    let conn = ctx.open_db()?;
    let (rows, total) = providers::search(&conn, &filter)?;
    Ok(Json(PaginatedResponse::new(
        rows,
        total,
        filter.page(),
        filter.limit(),
    )))
}

/// `GET /providers/summary` — conditional counts over the same filter.
pub async fn summary(
    State(ctx): State<ApiContext>,
    Query(filter): Query<ProviderFilter>,
) -> Result<Json<ProviderSummary>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(providers::summary(&conn, &filter)?))
}

/// `GET /providers/provinces` — distinct provinces for filter dropdowns.
pub async fn provinces(State(ctx): State<ApiContext>) -> Result<Json<Vec<String>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(providers::list_provinces(&conn)?))
}

/// `GET /providers/types` — distinct provider types.
pub async fn provider_types(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<String>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(providers::list_provider_types(&conn)?))
}

/// `GET /providers/stats` — unfiltered whole-table statistics.
pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<ProviderStats>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(providers::stats(&conn)?))
}

#[derive(Deserialize)]
pub struct CreateProviderRequest {
    pub provider_code: String,
    #[serde(flatten)]
    pub draft: ProviderDraft,
}

/// `POST /providers`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateProviderRequest>,
) -> Result<(StatusCode, Json<Provider>), ApiError> {
    let conn = ctx.open_db()?;
    let provider = providers::create(&conn, &req.provider_code, &req.draft, "system")?;
    Ok((StatusCode::CREATED, Json(provider)))
}

/// `GET /providers/:id`
pub async fn get_one(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Provider>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(providers::get(&conn, id)?))
}

/// `PUT /providers/:id` — full overwrite of the editable attribute set.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(draft): Json<ProviderDraft>,
) -> Result<Json<Provider>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(providers::update(&conn, id, &draft, "system")?))
}

/// `DELETE /providers/:id` — hard delete.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    providers::delete(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}
