//! Session entity - One row per successful login.
//!
//! Only the SHA-256 digest of the bearer token is stored. Sessions expire and
//! are removed on logout, when their user is deleted, or by the expiry sweep.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the session
    pub user_id: i64,
    /// Hex SHA-256 of the bearer token
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// When the session was opened
    pub created_at: DateTimeUtc,
    /// After this instant the token is no longer accepted
    pub expires_at: DateTimeUtc,
}

/// Defines relationships between Session and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
