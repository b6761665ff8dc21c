#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use pos_backend::{
    api::{ApiState, router::create_router},
    config::database,
    core::user::{NewUser, create_user},
    entities::Role,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<ApiState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = database::connect_in_memory()
            .await
            .expect("Failed to open test db");
        database::create_tables(&db)
            .await
            .expect("Failed to create tables");

        let state = Arc::new(ApiState {
            database: db,
            session_ttl: chrono::Duration::hours(12),
        });

        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    /// The connection the router is serving from.
    pub fn db(&self) -> &DatabaseConnection {
        &self.state.database
    }

    /// A fresh app with an `admin` account whose password is `admin123`.
    pub async fn with_admin() -> Self {
        let app = Self::new().await;
        app.create_user("admin", "admin123", Role::Admin).await;
        app
    }

    pub async fn create_user(&self, username: &str, password: &str, role: Role) -> i64 {
        create_user(
            self.db(),
            NewUser {
                username: username.to_string(),
                password: password.to_string(),
                first_name: "Test".to_string(),
                last_name: username.to_string(),
                role,
            },
            "setup",
        )
        .await
        .expect("Failed to create user")
        .id
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };
        (status, body)
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body), None).await
    }

    pub async fn post_as(&self, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body), Some(token)).await
    }

    /// Logs in and returns the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/login",
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "Login failed in test helper: {body}");
        body["token"].as_str().expect("No token in body").to_string()
    }
}

/// Asserts the uniform error envelope and returns its `error` code.
pub fn assert_error(body: &Value) -> String {
    assert_eq!(body["success"], false, "not an error envelope: {body}");
    assert!(body["message"].is_string(), "missing message: {body}");
    body["error"].as_str().expect("missing error code").to_string()
}
