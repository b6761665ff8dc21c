//! Liveness check.

use crate::api::{ApiState, error::ApiResult};
use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;

/// `GET /health`: pings the database.
pub async fn health_check(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Value>> {
    state
        .database
        .ping()
        .await
        .map_err(crate::errors::Error::from)?;
    Ok(Json(json!({ "status": "ok" })))
}
