mod common;

use axum::http::StatusCode;
use common::setup_test_app;

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = setup_test_app();
    let (status, doc) = app.request("GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["info"]["title"], "Wayfare API");
    for path in [
        "/api/auth/signup",
        "/api/auth/login",
        "/api/auth/refresh",
        "/api/auth/me",
        "/api/profile",
        "/api/profile/driver/availability",
        "/api/admin/drivers/{id}/reject",
        "/api/admin/users/{id}/status",
        "/health",
    ] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
    assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_metrics_not_served_when_disabled() {
    let app = setup_test_app();
    let (status, _) = app.request("GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
