//! Bearer-token boundary for the authorization collaborator.
//!
//! Real permission decisions (menu/action rights) live in an upstream
//! service; this process only enforces the transport-level contract:
//! when a token is configured, every request must present it. With no
//! token configured the check is a no-op, for deployments where the
//! gateway in front already authenticates.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Require `Authorization: Bearer <token>` when a token is configured.
pub async fn require_token(req: Request<axum::body::Body>, next: Next) -> Response {
    let Some(ctx) = req.extensions().get::<ApiContext>().cloned() else {
        return ApiError::Internal("missing API context".into()).into_response();
    };

    let Some(expected) = ctx.config.api_token.as_deref() else {
        return next.run(req).await;
    };

    let presented = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => next.run(req).await,
        _ => ApiError::Unauthorized.into_response(),
    }
}
