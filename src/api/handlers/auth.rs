//! `/api/login` and `/api/logout`.

use crate::{
    api::{
        ApiState,
        dto::{LoginRequest, LogoutRequest},
        error::ApiResult,
        extract::{ApiJson, bearer_token},
    },
    core::auth,
};
use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde_json::{Value, json};
use std::sync::Arc;

/// `POST /api/login`: returns the user and a bearer token.
pub async fn login(
    State(state): State<Arc<ApiState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let outcome = auth::login(
        &state.database,
        &payload.username,
        &payload.password,
        state.session_ttl,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "user": outcome.user,
        "token": outcome.token,
        "expiresAt": outcome.expires_at,
    })))
}

/// `POST /api/logout`
///
/// Always succeeds. The body is optional and read leniently, since clients call
/// this while tearing down and may send nothing at all.
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let payload: LogoutRequest = if body.is_empty() {
        LogoutRequest::default()
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "ignoring unreadable logout body");
            LogoutRequest::default()
        })
    };
    auth::logout(&state.database, payload.id, bearer_token(&headers)).await?;

    Ok(Json(json!({ "success": true, "message": "Logged out" })))
}
