//! Route table and middleware.
//!
//! Every endpoint lives under `/api` except `/health`. Requests get a tracing
//! span carrying a request id, and panics are caught and rendered as JSON.

use crate::api::{
    ApiState,
    error,
    handlers::{auth, catalog, health, order, reports, users},
};
use axum::{
    Router,
    body::Body,
    extract::Request,
    routing::{get, post},
};
use std::{sync::Arc, time::Duration};
use tower_http::{catch_panic::CatchPanicLayer, classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{Span, info, info_span};
use uuid::Uuid;

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        // Auth
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))

        // Cashier
        .route("/menu", get(catalog::menu))
        .route("/order", post(order::place_order))
        .route("/orders/{reference}", get(order::get_order))

        // Dashboard
        .route("/dashboard-stats", get(reports::dashboard_stats))
        .route("/daily-sales", get(reports::daily_sales))
        .route("/sales-category", get(reports::sales_by_category))
        .route("/history", get(reports::history))
        .route("/logs", get(reports::logs))

        // Users
        .route("/users", get(users::list_users))
        .route("/users/online", get(users::online_users))
        .route("/users/add", post(users::add_user))
        .route("/users/update", post(users::update_user))
        .route("/users/delete", post(users::delete_user))

        // Catalog
        .route("/categories", get(catalog::list_categories))
        .route("/categories/add", post(catalog::add_category))
        .route("/categories/update", post(catalog::update_category))
        .route("/categories/delete", post(catalog::delete_category))
        .route("/products/add", post(catalog::add_product))
        .route("/add-product", post(catalog::add_product))
        .route("/products/update", post(catalog::update_product))
        .route("/products/delete", post(catalog::delete_product))
        .method_not_allowed_fallback(error::method_not_allowed)
}

/// Builds the application router over shared state.
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .fallback(error::not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    tracing::error!("request failed: {:?}", error);
                }),
        )
        .with_state(state)
}
