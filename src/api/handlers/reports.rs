//! Read-only dashboard endpoints.

use crate::{
    api::{ApiState, error::ApiResult},
    core::report::{self, CategorySales, DailySales, DashboardStats},
    entities::{AuditLogModel, TransactionModel},
};
use axum::{Json, extract::State};
use chrono::Utc;
use std::sync::Arc;

/// `GET /api/dashboard-stats`
pub async fn dashboard_stats(State(state): State<Arc<ApiState>>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(report::dashboard_stats(&state.database, Utc::now()).await?))
}

/// `GET /api/daily-sales`
pub async fn daily_sales(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Vec<DailySales>>> {
    Ok(Json(report::daily_sales(&state.database, Utc::now()).await?))
}

/// `GET /api/sales-category`
pub async fn sales_by_category(
    State(state): State<Arc<ApiState>>,
) -> ApiResult<Json<Vec<CategorySales>>> {
    Ok(Json(report::sales_by_category(&state.database).await?))
}

/// `GET /api/history`: the latest orders.
pub async fn history(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Vec<TransactionModel>>> {
    Ok(Json(report::history(&state.database).await?))
}

/// `GET /api/logs`: the latest audit entries.
pub async fn logs(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Vec<AuditLogModel>>> {
    Ok(Json(report::audit_logs(&state.database).await?))
}
