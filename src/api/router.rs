//! Route table. One surface per resource, nested under
//! `/api/provider-report`.
//!
//! Middleware stack (outermost → innermost):
//! CORS → Extension(ApiContext) → auth boundary → audit log → handler.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        // Providers
        .route("/providers/search", get(endpoints::providers::search))
        .route("/providers/summary", get(endpoints::providers::summary))
        .route("/providers/provinces", get(endpoints::providers::provinces))
        .route("/providers/types", get(endpoints::providers::provider_types))
        .route("/providers/stats", get(endpoints::providers::stats))
        .route("/providers", post(endpoints::providers::create))
        .route(
            "/providers/:id",
            get(endpoints::providers::get_one)
                .put(endpoints::providers::update)
                .delete(endpoints::providers::delete),
        )
        // Reports
        .route("/reports/generate", post(endpoints::reports::generate))
        .route("/reports/export", post(endpoints::reports::export))
        // Templates
        .route(
            "/templates",
            get(endpoints::templates::list).post(endpoints::templates::create),
        )
        .route(
            "/templates/:id",
            get(endpoints::templates::get_one)
                .put(endpoints::templates::update)
                .delete(endpoints::templates::delete),
        )
        // Field registry
        .route(
            "/fields",
            get(endpoints::fields::list).post(endpoints::fields::create),
        )
        .route("/fields/categories", get(endpoints::fields::categories))
        .route(
            "/fields/category/:category",
            get(endpoints::fields::by_category),
        )
        .route("/fields/validate", post(endpoints::fields::validate))
        .route(
            "/fields/:id",
            axum::routing::put(endpoints::fields::update).delete(endpoints::fields::deactivate),
        )
        // Schedules
        .route(
            "/schedules",
            get(endpoints::schedules::list).post(endpoints::schedules::create),
        )
        .route(
            "/schedules/:id",
            get(endpoints::schedules::get_one)
                .put(endpoints::schedules::update)
                .delete(endpoints::schedules::delete),
        )
        .route("/schedules/:id/run", post(endpoints::schedules::run))
        // Send log
        .route(
            "/logs",
            get(endpoints::logs::list).post(endpoints::logs::create),
        )
        .route("/logs/:id", get(endpoints::logs::get_one))
        .with_state(ctx.clone())
        // Middleware (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::auth::require_token))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx))
        .layer(CorsLayer::permissive());

    Router::new().nest("/api/provider-report", routes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    struct TestApi {
        router: Router,
        // Keeps the database file alive for the test's duration.
        _dir: tempfile::TempDir,
    }

    fn test_api() -> TestApi {
        test_api_with_token(None)
    }

    fn test_api_with_token(api_token: Option<String>) -> TestApi {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("test.db"),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            api_token,
        };
        TestApi {
            router: api_router(ApiContext::new(Arc::new(config))),
            _dir: dir,
        }
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 10 * 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_reachable() {
        let api = test_api();
        let response = api
            .router
            .oneshot(get_request("/api/provider-report/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let api = test_api();
        let response = api
            .router
            .oneshot(get_request("/api/provider-report/nonexistent"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn configured_token_is_enforced() {
        let api = test_api_with_token(Some("secret".to_string()));
        let response = api
            .router
            .clone()
            .oneshot(get_request("/api/provider-report/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let authed = Request::builder()
            .uri("/api/provider-report/health")
            .header("Authorization", "Bearer secret")
            .body(Body::empty())
            .unwrap();
        let response = api.router.oneshot(authed).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn provider_create_then_search_pages_correctly() {
        let api = test_api();

        for i in 1..=25 {
            let body = format!(
                r#"{{"provider_code":"H-{i:02}","name_local":"Hospital {i}","provider_type":"Hospital","province":"Bangkok"}}"#
            );
            let response = api
                .router
                .clone()
                .oneshot(post_json("/api/provider-report/providers", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = api
            .router
            .oneshot(get_request(
                "/api/provider-report/providers/search?provider_type=Hospital&page=2&limit=10",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 25);
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["page"], 2);
        assert_eq!(json["data"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn template_with_unknown_code_is_rejected_naming_it() {
        let api = test_api();
        let response = api
            .router
            .oneshot(post_json(
                "/api/provider-report/templates",
                r#"{"template_name":"Bad","data_fields":["provider_code","bogus_code"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("bogus_code"));
    }

    #[tokio::test]
    async fn template_round_trips_field_order() {
        let api = test_api();
        let response = api
            .router
            .clone()
            .oneshot(post_json(
                "/api/provider-report/templates",
                r#"{"template_name":"Ordered","data_fields":["province","provider_code","name_local"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_i64().unwrap();

        let response = api
            .router
            .oneshot(get_request(&format!(
                "/api/provider-report/templates/{id}"
            )))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(
            json["data_fields"],
            serde_json::json!(["province", "provider_code", "name_local"])
        );
    }

    #[tokio::test]
    async fn export_pdf_returns_501_not_bytes() {
        let api = test_api();
        let response = api
            .router
            .oneshot(post_json(
                "/api/provider-report/reports/export",
                r#"{"format_type":"pdf"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_IMPLEMENTED");
    }

    #[tokio::test]
    async fn export_excel_ships_an_attachment() {
        let api = test_api();
        let response = api
            .router
            .oneshot(post_json(
                "/api/provider-report/reports/export",
                r#"{"format_type":"excel","custom_fields":["provider_code","name_en"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=provider_report_"));
        let bytes = to_bytes(response.into_body(), 10 * 1024 * 1024).await.unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn unknown_field_category_is_a_client_error() {
        let api = test_api();
        let response = api
            .router
            .oneshot(get_request(
                "/api/provider-report/fields/category/detail",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn schedule_with_dead_template_is_404() {
        let api = test_api();
        let response = api
            .router
            .oneshot(post_json(
                "/api/provider-report/schedules",
                r#"{"schedule_name":"Orphan","template_id":42,"email_to":"a@b.co",
                    "frequency":"daily","start_date":"2024-01-01","start_time":"08:00"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_provider_is_404() {
        let api = test_api();
        let response = api
            .router
            .oneshot(get_request("/api/provider-report/providers/999"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
