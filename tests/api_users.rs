mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{TestApp, assert_error};
use pos_backend::{
    core::user as users,
    entities::{Session, session},
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

fn new_user(username: &str, role: &str) -> serde_json::Value {
    json!({
        "username": username,
        "password": "secret",
        "firstName": "Ana",
        "lastName": "Reyes",
        "role": role
    })
}

#[tokio::test]
async fn test_add_and_list_users() {
    let app = TestApp::with_admin().await;

    let (status, body) = app.post("/api/users/add", new_user("ana", "cashier")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["first_name"], "Ana");
    assert_eq!(body["user"]["role"], "cashier");
    assert!(body["user"].get("password_hash").is_none());

    let (status, list) = app.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["admin", "ana"]);

    let (_, logs) = app.get("/api/logs").await;
    assert_eq!(logs[0]["action"], "Created user ana");
    assert_eq!(logs[0]["username"], "Admin");
}

#[tokio::test]
async fn test_add_user_rejections() {
    let app = TestApp::with_admin().await;

    let (status, body) = app.post("/api/users/add", new_user("admin", "cashier")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(assert_error(&body), "conflict");

    let (status, body) = app.post("/api/users/add", new_user("bob", "owner")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error(&body), "validation_error");

    let mut no_password = new_user("carl", "manager");
    no_password["password"] = json!("");
    let (status, _) = app.post("/api/users/add", no_password).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_with_and_without_password() {
    let app = TestApp::with_admin().await;
    let (_, body) = app.post("/api/users/add", new_user("ana", "cashier")).await;
    let id = body["user"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/users/update",
            json!({
                "id": id,
                "username": "ana.r",
                "firstName": "Ana",
                "lastName": "Reyes",
                "role": "manager",
                "password": ""
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "ana.r");
    assert_eq!(body["user"]["role"], "manager");
    app.login("ana.r", "secret").await;

    let (status, _) = app
        .post(
            "/api/users/update",
            json!({
                "id": id,
                "username": "ana.r",
                "firstName": "Ana",
                "lastName": "Reyes",
                "role": "manager",
                "password": "changed"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    app.login("ana.r", "changed").await;

    let (status, body) = app
        .post(
            "/api/users/update",
            json!({ "id": 9999, "username": "x", "firstName": "", "lastName": "", "role": "cashier" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(assert_error(&body), "not_found");
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::with_admin().await;
    let (_, body) = app.post("/api/users/add", new_user("ana", "cashier")).await;
    let id = body["user"]["id"].as_i64().unwrap();
    app.login("ana", "secret").await;

    let (status, body) = app.post("/api/users/delete", json!({ "id": id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "deleted": true }));
    assert!(users::get_user_by_id(app.db(), id).await.unwrap().is_none());

    // Deleting again, or without an id, still reports success
    let (status, body) = app.post("/api/users/delete", json!({ "id": id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], false);
    let (status, _) = app.post("/api/users/delete", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, logs) = app.get("/api/logs").await;
    assert_eq!(logs[0]["action"], "Deleted user ana");
}

#[tokio::test]
async fn test_online_users_follow_sessions() {
    let app = TestApp::with_admin().await;
    app.create_user("ana", "secret", pos_backend::entities::Role::Cashier)
        .await;

    let (_, online) = app.get("/api/users/online").await;
    assert_eq!(online, json!([]));

    app.login("ana", "secret").await;
    let admin_token = app.login("admin", "admin123").await;

    let (_, online) = app.get("/api/users/online").await;
    let names: Vec<&str> = online
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["admin", "ana"]);

    // Expire every session of ana
    let ana = users::get_user_by_username(app.db(), "ana").await.unwrap().unwrap();
    for found in Session::find().all(app.db()).await.unwrap() {
        if found.user_id == ana.id {
            let mut active: session::ActiveModel = found.into();
            active.expires_at = Set(Utc::now() - Duration::minutes(1));
            active.update(app.db()).await.unwrap();
        }
    }

    let (_, online) = app.get("/api/users/online").await;
    assert_eq!(online.as_array().unwrap().len(), 1);
    assert_eq!(online[0]["username"], "admin");

    app.post_as("/api/logout", json!({}), &admin_token).await;
    let (_, online) = app.get("/api/users/online").await;
    assert_eq!(online, json!([]));
}
