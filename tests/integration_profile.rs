mod common;

use axum::http::StatusCode;
use common::{setup_test_app, token};
use serde_json::json;

#[tokio::test]
async fn test_get_profile_for_rider_and_driver() {
    let app = setup_test_app();

    let rider = app.signup("rider").await;
    let (status, body) = app
        .request("GET", "/api/profile", Some(token(&rider)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], rider["user"]["id"]);
    assert!(body["riderProfile"].is_object());
    assert!(body.get("driverProfile").is_none());

    let driver = app.signup("driver").await;
    let (status, body) = app
        .request("GET", "/api/profile", Some(token(&driver)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["driverProfile"]["status"], "pending_approval");
    assert!(body.get("riderProfile").is_none());
}

#[tokio::test]
async fn test_update_profile() {
    let app = setup_test_app();
    let rider = app.signup("rider").await;

    let (status, body) = app
        .request(
            "PATCH",
            "/api/profile",
            Some(token(&rider)),
            Some(json!({ "firstName": "Grace", "phoneNumber": "0987654321" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["firstName"], "Grace");
    assert_eq!(body["user"]["phoneNumber"], "0987654321");
    assert_eq!(body["user"]["lastName"], rider["user"]["lastName"]);
}

#[tokio::test]
async fn test_update_profile_short_phone_is_rejected() {
    let app = setup_test_app();
    let rider = app.signup("rider").await;

    let (status, body) = app
        .request(
            "PATCH",
            "/api/profile",
            Some(token(&rider)),
            Some(json!({ "phoneNumber": "123" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "phoneNumber");
}

#[tokio::test]
async fn test_profile_requires_authentication() {
    let app = setup_test_app();
    let (status, body) = app.request("GET", "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_driver_routes_forbid_riders() {
    let app = setup_test_app();
    let rider = app.signup("rider").await;

    for (method, uri) in [
        ("GET", "/api/profile/driver"),
        ("GET", "/api/profile/driver/documents"),
    ] {
        let (status, _) = app.request(method, uri, Some(token(&rider)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
    }

    let (status, _) = app
        .request(
            "PATCH",
            "/api/profile/driver/availability",
            Some(token(&rider)),
            Some(json!({ "isAvailable": false })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_driver_profile_merges_vehicle() {
    let app = setup_test_app();
    let driver = app.signup("driver").await;

    let (status, _) = app
        .request(
            "PATCH",
            "/api/profile/driver",
            Some(token(&driver)),
            Some(json!({
                "licenseNumber": "D1234567",
                "licenseExpiry": "2030-06-30",
                "vehicle": { "make": "Toyota", "model": "Prius", "year": 2021 }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            "PATCH",
            "/api/profile/driver",
            Some(token(&driver)),
            Some(json!({ "vehicle": { "color": "Silver", "plateNumber": "ABC123" } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["licenseNumber"], "D1234567");
    assert_eq!(body["licenseExpiry"], "2030-06-30");
    assert_eq!(body["vehicle"]["make"], "Toyota");
    assert_eq!(body["vehicle"]["year"], 2021);
    assert_eq!(body["vehicle"]["color"], "Silver");
    assert_eq!(body["vehicle"]["plateNumber"], "ABC123");
    assert_eq!(body["status"], "pending_approval");
}

#[tokio::test]
async fn test_vehicle_year_out_of_range_has_dotted_field() {
    let app = setup_test_app();
    let driver = app.signup("driver").await;

    let (status, body) = app
        .request(
            "PATCH",
            "/api/profile/driver",
            Some(token(&driver)),
            Some(json!({ "vehicle": { "year": 1900 } })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "vehicle.year");
}

#[tokio::test]
async fn test_documents_append_in_upload_order() {
    let app = setup_test_app();
    let driver = app.signup("driver").await;

    for doc_type in ["license", "insurance", "registration"] {
        let (status, body) = app
            .request(
                "POST",
                "/api/profile/driver/documents",
                Some(token(&driver)),
                Some(json!({
                    "type": doc_type,
                    "fileUrl": format!("https://files.example.com/{doc_type}.pdf")
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], doc_type);
        assert_eq!(body["status"], "pending");
    }

    let (status, body) = app
        .request("GET", "/api/profile/driver/documents", Some(token(&driver)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let types: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["license", "insurance", "registration"]);

    let (_, profile) = app
        .request("GET", "/api/profile/driver", Some(token(&driver)), None)
        .await;
    assert_eq!(profile["documents"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_document_type_and_url_are_validated() {
    let app = setup_test_app();
    let driver = app.signup("driver").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/profile/driver/documents",
            Some(token(&driver)),
            Some(json!({ "type": "passport" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "type");

    let (status, body) = app
        .request(
            "POST",
            "/api/profile/driver/documents",
            Some(token(&driver)),
            Some(json!({ "type": "license", "fileUrl": "not a url" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "fileUrl");
}

#[tokio::test]
async fn test_pending_driver_cannot_go_available() {
    let app = setup_test_app();
    let driver = app.signup("driver").await;

    let (status, body) = app
        .request(
            "PATCH",
            "/api/profile/driver/availability",
            Some(token(&driver)),
            Some(json!({ "isAvailable": true })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({ "error": "Driver must be approved before going available" })
    );

    let (status, body) = app
        .request(
            "PATCH",
            "/api/profile/driver/availability",
            Some(token(&driver)),
            Some(json!({ "isAvailable": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAvailable"], false);
}

#[tokio::test]
async fn test_approved_driver_can_go_available() {
    let app = setup_test_app();
    let (_, admin_token) = app.seed_admin().await;
    let driver = app.signup("driver").await;
    let profile_id = app.driver_profile_id(&driver).await;

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/admin/drivers/{profile_id}/approve"),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            "PATCH",
            "/api/profile/driver/availability",
            Some(token(&driver)),
            Some(json!({ "isAvailable": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAvailable"], true);
}
