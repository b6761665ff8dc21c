//! User administration endpoints.

use crate::{
    api::{
        ApiState,
        dto::{CreateUserRequest, IdRequest, UpdateUserRequest},
        error::ApiResult,
        extract::{Actor, ApiJson},
    },
    core::{auth, user as users},
    entities::UserModel,
};
use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;

/// `GET /api/users`
pub async fn list_users(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Vec<UserModel>>> {
    Ok(Json(users::list_users(&state.database).await?))
}

/// `GET /api/users/online`
///
/// Expired sessions are purged first so their owners drop out of the list.
pub async fn online_users(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Vec<UserModel>>> {
    auth::purge_expired_sessions(&state.database, Utc::now()).await?;
    Ok(Json(users::list_online_users(&state.database).await?))
}

/// `POST /api/users/add`
pub async fn add_user(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<Json<Value>> {
    let created = users::create_user(&state.database, payload.into_new_user()?, &actor.username).await?;
    Ok(Json(json!({ "success": true, "user": created })))
}

/// `POST /api/users/update`
pub async fn update_user(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<Value>> {
    let updated = users::update_user(&state.database, payload.into_update()?, &actor.username).await?;
    Ok(Json(json!({ "success": true, "user": updated })))
}

/// `POST /api/users/delete`
///
/// Deleting an id that does not exist still reports success.
pub async fn delete_user(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<IdRequest>,
) -> ApiResult<Json<Value>> {
    let deleted = match payload.id {
        Some(id) => users::delete_user(&state.database, id, &actor.username).await?,
        None => false,
    };
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}
