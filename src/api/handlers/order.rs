//! Order placement and receipt lookup.

use crate::{
    api::{ApiState, dto::OrderRequest, error::ApiResult, extract::ApiJson},
    core::order::{self, Receipt},
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// `POST /api/order`
pub async fn place_order(
    State(state): State<Arc<ApiState>>,
    ApiJson(payload): ApiJson<OrderRequest>,
) -> ApiResult<Json<Value>> {
    let receipt = order::place_order(&state.database, payload.into()).await?;
    Ok(Json(json!({
        "success": true,
        "transaction": receipt.transaction,
        "items": receipt.items,
    })))
}

/// `GET /api/orders/{reference}`
pub async fn get_order(
    State(state): State<Arc<ApiState>>,
    Path(reference): Path<String>,
) -> ApiResult<Json<Receipt>> {
    Ok(Json(order::get_order(&state.database, &reference).await?))
}
