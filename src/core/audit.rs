//! Audit log business logic.
//!
//! Administrative operations append one free-text entry each. Entries are
//! never updated or deleted.

use crate::{
    entities::{AuditLog, audit_log},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};

/// Username recorded when a request does not carry a live session.
pub const DEFAULT_ACTOR: &str = "Admin";

/// Appends an audit entry. Accepts a transaction so the entry commits or
/// rolls back with the change it describes.
pub async fn record<C>(db: &C, username: &str, action: impl Into<String>) -> Result<audit_log::Model>
where
    C: ConnectionTrait,
{
    let entry = audit_log::ActiveModel {
        username: Set(username.to_string()),
        action: Set(action.into()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    entry.insert(db).await.map_err(Into::into)
}

/// Returns the `limit` most recent entries, newest first.
pub async fn latest_entries(db: &DatabaseConnection, limit: u64) -> Result<Vec<audit_log::Model>> {
    AuditLog::find()
        .order_by_desc(audit_log::Column::CreatedAt)
        .order_by_desc(audit_log::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
