//! JSON-over-HTTP interface.
//!
//! Handlers are thin: they decode a request, call into [`crate::core`], and wrap
//! the result in the response envelope the cashier and admin screens expect.

use sea_orm::DatabaseConnection;

/// Request and response bodies
pub mod dto;
/// JSON error responses
pub mod error;
/// Request extractors
pub mod extract;
/// Route handlers
pub mod handlers;
/// Route table and middleware
pub mod router;

/// Shared state handed to every handler, behind an `Arc`.
#[derive(Debug)]
pub struct ApiState {
    /// Connection pool
    pub database: DatabaseConnection,
    /// Lifetime of sessions opened by `/api/login`
    pub session_ttl: chrono::Duration,
}
