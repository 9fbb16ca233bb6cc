//! Audit logging middleware.
//!
//! Emits one structured line per request with method, path and response
//! status. Shipping these lines anywhere (file, Elasticsearch, …) is the
//! log collector's job, not this process's.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// Log API access for the audit trail.
pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        %request_id,
        method,
        path,
        status = response.status().as_u16(),
        "api access"
    );

    response
}
