mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error};
use pos_backend::{
    core::{password, user as users},
    entities::Role,
};
use serde_json::json;

#[tokio::test]
async fn test_login_returns_sanitized_user_and_sets_status() {
    let app = TestApp::with_admin().await;

    let (status, body) = app
        .post("/api/login", json!({ "username": "admin", "password": "admin123" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["status"], 1);
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let stored = users::get_user_by_username(app.db(), "admin").await.unwrap().unwrap();
    assert_eq!(stored.status, 1);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = TestApp::with_admin().await;

    let (wrong_status, wrong_body) = app
        .post("/api/login", json!({ "username": "admin", "password": "nope" }))
        .await;
    let (unknown_status, unknown_body) = app
        .post("/api/login", json!({ "username": "ghost", "password": "nope" }))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(assert_error(&wrong_body), "invalid_credentials");
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_missing_fields_is_validation_error() {
    let app = TestApp::with_admin().await;
    let (status, body) = app.post("/api/login", json!({ "username": "admin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "validation_error");
}

#[tokio::test]
async fn test_legacy_hash_is_upgraded_on_login() {
    let app = TestApp::new().await;
    users::insert_user_with_hash(
        app.db(),
        "cashier",
        password::legacy_digest("123"),
        "Cash",
        "Ier",
        Role::Cashier,
    )
    .await
    .unwrap();

    app.login("cashier", "123").await;
    let stored = users::get_user_by_username(app.db(), "cashier").await.unwrap().unwrap();
    assert_eq!(
        password::verify_password("123", &stored.password_hash),
        password::Verification::Strong
    );

    // The upgraded hash keeps working
    app.login("cashier", "123").await;
}

#[tokio::test]
async fn test_logout_by_id_clears_status() {
    let app = TestApp::with_admin().await;
    app.login("admin", "admin123").await;
    let admin = users::get_user_by_username(app.db(), "admin").await.unwrap().unwrap();

    let (status, body) = app.post("/api/logout", json!({ "id": admin.id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Logged out" }));

    let stored = users::get_user_by_id(app.db(), admin.id).await.unwrap().unwrap();
    assert_eq!(stored.status, 0);
}

#[tokio::test]
async fn test_logout_accepts_string_id() {
    let app = TestApp::with_admin().await;
    app.login("admin", "admin123").await;
    let admin = users::get_user_by_username(app.db(), "admin").await.unwrap().unwrap();
    assert_eq!(admin.status, 1);

    let (status, _) = app
        .post("/api/logout", json!({ "id": admin.id.to_string() }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let stored = users::get_user_by_id(app.db(), admin.id).await.unwrap().unwrap();
    assert_eq!(stored.status, 0);
}

#[tokio::test]
async fn test_logout_without_id_or_with_unknown_id_succeeds() {
    let app = TestApp::with_admin().await;
    app.login("admin", "admin123").await;

    let (status, body) = app.request("POST", "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app.post("/api/logout", json!({ "id": 9999 })).await;
    assert_eq!(status, StatusCode::OK);

    // Unrelated rows untouched
    let admin = users::get_user_by_username(app.db(), "admin").await.unwrap().unwrap();
    assert_eq!(admin.status, 1);
}

#[tokio::test]
async fn test_logout_with_bearer_token() {
    let app = TestApp::with_admin().await;
    let token = app.login("admin", "admin123").await;

    let (status, _) = app.post_as("/api/logout", json!({}), &token).await;
    assert_eq!(status, StatusCode::OK);

    let admin = users::get_user_by_username(app.db(), "admin").await.unwrap().unwrap();
    assert_eq!(admin.status, 0);

    // The token no longer identifies anyone
    app.post_as("/api/categories/add", json!({ "name": "Drinks" }), &token)
        .await;
    let (_, logs) = app.get("/api/logs").await;
    assert_eq!(logs[0]["username"], "Admin");
}

#[tokio::test]
async fn test_token_attributes_audit_entries() {
    let app = TestApp::with_admin().await;
    app.create_user("maria", "pw", Role::Manager).await;
    let token = app.login("maria", "pw").await;

    let (status, _) = app
        .post_as("/api/categories/add", json!({ "name": "Drinks" }), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, logs) = app.get("/api/logs").await;
    assert_eq!(logs[0]["username"], "maria");
    assert_eq!(logs[0]["action"], "Created category Drinks");
}
