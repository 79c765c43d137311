mod common;

use axum::http::StatusCode;
use common::{TEST_PASSWORD, setup_test_app, token};
use serde_json::json;
use wayfare::store::UserStore;
use wayfare_models::{DriverProfileId, DriverStatus, UserId, UserStatus};

#[tokio::test]
async fn test_admin_routes_forbid_non_admins() {
    let app = setup_test_app();
    let rider = app.signup("rider").await;
    let driver = app.signup("driver").await;

    for caller in [&rider, &driver] {
        for uri in ["/api/admin/users", "/api/admin/drivers", "/api/admin/drivers/pending"] {
            let (status, body) = app.request("GET", uri, Some(token(caller)), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
            assert!(body["error"].is_string());
        }
    }
}

#[tokio::test]
async fn test_non_admin_approve_changes_nothing() {
    let app = setup_test_app();
    let driver = app.signup("driver").await;
    let other_driver = app.signup("driver").await;
    let profile_id = app.driver_profile_id(&driver).await;

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/admin/drivers/{profile_id}/approve"),
            Some(token(&other_driver)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let id: DriverProfileId = profile_id.parse().unwrap();
    let profile = app.store.find_driver_profile_by_id(id).await.unwrap().unwrap();
    assert_eq!(profile.status, DriverStatus::PendingApproval);
    assert!(profile.approved_by.is_none());
    assert!(profile.approved_at.is_none());
}

#[tokio::test]
async fn test_admin_routes_require_authentication() {
    let app = setup_test_app();
    let (status, _) = app.request("GET", "/api/admin/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pending_drivers_and_status_filter() {
    let app = setup_test_app();
    let (_, admin_token) = app.seed_admin().await;
    let first = app.signup("driver").await;
    let second = app.signup("driver").await;
    app.signup("rider").await;

    let first_profile = app.driver_profile_id(&first).await;
    app.request(
        "POST",
        &format!("/api/admin/drivers/{first_profile}/approve"),
        Some(&admin_token),
        None,
    )
    .await;

    let (status, pending) = app
        .request("GET", "/api/admin/drivers/pending", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["user"]["id"], second["user"]["id"]);
    assert_eq!(pending[0]["driverProfile"]["status"], "pending_approval");

    let (_, all) = app
        .request("GET", "/api/admin/drivers", Some(&admin_token), None)
        .await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, approved) = app
        .request("GET", "/api/admin/drivers?status=approved", Some(&admin_token), None)
        .await;
    let approved = approved.as_array().unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0]["driverProfile"]["id"], first_profile.as_str());

    let (status, body) = app
        .request("GET", "/api/admin/drivers?status=flying", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "status");
    assert_eq!(
        body["details"][0]["message"],
        "status has an unsupported value 'flying'"
    );
}

#[tokio::test]
async fn test_approve_driver() {
    let app = setup_test_app();
    let (admin, admin_token) = app.seed_admin().await;
    let driver = app.signup("driver").await;
    let profile_id = app.driver_profile_id(&driver).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/admin/drivers/{profile_id}/approve"),
            Some(&admin_token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["approvedBy"], admin.id.to_string());
    assert!(body["approvedAt"].is_string());

    // Approving again re-stamps without error.
    let (status, _) = app
        .request(
            "POST",
            &format!("/api/admin/drivers/{profile_id}/approve"),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reject_driver_locks_account() {
    let app = setup_test_app();
    let (admin, admin_token) = app.seed_admin().await;
    let driver = app.signup("driver").await;
    let profile_id = app.driver_profile_id(&driver).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/admin/drivers/{profile_id}/reject"),
            Some(&admin_token),
            Some(json!({ "reason": "License photo unreadable" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["driverProfile"]["status"], "rejected");
    assert_eq!(body["driverProfile"]["rejectionReason"], "License photo unreadable");
    assert_eq!(body["driverProfile"]["approvedBy"], admin.id.to_string());
    assert_eq!(body["user"]["status"], "rejected");

    let user_id: UserId = driver["user"]["id"].as_str().unwrap().parse().unwrap();
    let stored = app.store.find_user_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Rejected);

    // Existing token no longer works on guarded routes, and login is refused.
    let (status, _) = app
        .request("GET", "/api/profile/driver", Some(token(&driver)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": driver["user"]["email"], "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let app = setup_test_app();
    let (_, admin_token) = app.seed_admin().await;
    let driver = app.signup("driver").await;
    let profile_id = app.driver_profile_id(&driver).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/admin/drivers/{profile_id}/reject"),
            Some(&admin_token),
            Some(json!({ "reason": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "reason");

    let user_id: UserId = driver["user"]["id"].as_str().unwrap().parse().unwrap();
    let stored = app.store.find_user_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Active);
}

#[tokio::test]
async fn test_review_unknown_or_malformed_id() {
    let app = setup_test_app();
    let (_, admin_token) = app.seed_admin().await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/admin/drivers/{}/approve", DriverProfileId::new()),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Driver profile not found" }));

    let (status, body) = app
        .request(
            "POST",
            "/api/admin/drivers/not-a-uuid/reject",
            Some(&admin_token),
            Some(json!({ "reason": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "id");
}

#[tokio::test]
async fn test_list_users_with_filters() {
    let app = setup_test_app();
    let (_, admin_token) = app.seed_admin().await;
    app.signup("rider").await;
    app.signup("rider").await;
    app.signup("driver").await;

    let (status, all) = app
        .request("GET", "/api/admin/users", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 4);
    assert!(all.as_array().unwrap().iter().all(|u| u.get("passwordHash").is_none()));

    let (_, riders) = app
        .request("GET", "/api/admin/users?role=rider", Some(&admin_token), None)
        .await;
    assert_eq!(riders.as_array().unwrap().len(), 2);

    let (_, active_drivers) = app
        .request(
            "GET",
            "/api/admin/users?role=driver&status=active",
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(active_drivers.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_user_status() {
    let app = setup_test_app();
    let (_, admin_token) = app.seed_admin().await;
    let rider = app.signup("rider").await;
    let rider_id = rider["user"]["id"].as_str().unwrap();

    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/admin/users/{rider_id}/status"),
            Some(&admin_token),
            Some(json!({ "status": "inactive" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inactive");

    let (status, _) = app
        .request("GET", "/api/profile", Some(token(&rider)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/admin/users/{rider_id}/status"),
            Some(&admin_token),
            Some(json!({ "status": "banned" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "status");
}

#[tokio::test]
async fn test_admin_cannot_change_own_status() {
    let app = setup_test_app();
    let (admin, admin_token) = app.seed_admin().await;

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/admin/users/{}/status", admin.id),
            Some(&admin_token),
            Some(json!({ "status": "inactive" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let stored = app.store.find_user_by_id(admin.id).await.unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Active);
}

#[tokio::test]
async fn test_update_status_of_unknown_user() {
    let app = setup_test_app();
    let (_, admin_token) = app.seed_admin().await;

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/admin/users/{}/status", UserId::new()),
            Some(&admin_token),
            Some(json!({ "status": "active" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
