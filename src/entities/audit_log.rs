//! Audit log entity - Append-only record of administrative actions.
//!
//! `username` is free text rather than a foreign key so entries survive the
//! deletion of the account that made them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Who performed the action
    pub username: String,
    /// What was done (e.g., `"Created user alice"`)
    pub action: String,
    /// When it happened
    pub created_at: DateTimeUtc,
}

/// `AuditLog` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
