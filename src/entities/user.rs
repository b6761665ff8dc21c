//! User entity - Accounts that can sign in to the POS.
//!
//! Each user has a unique username, a password hash (argon2 PHC string, or a
//! legacy SHA-256 hex digest until the next successful login), a display name,
//! a role, and an online-status flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::Error;

/// Closed set of roles a user can hold.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every screen
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Catalog and sales reports
    #[sea_orm(string_value = "manager")]
    Manager,
    /// User administration and the dashboard
    #[sea_orm(string_value = "security")]
    Security,
    /// Order entry only
    #[sea_orm(string_value = "cashier")]
    Cashier,
}

impl Role {
    /// The lowercase name stored in the database and sent over the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Security => "security",
            Self::Cashier => "cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "security" => Ok(Self::Security),
            "cashier" => Ok(Self::Cashier),
            other => Err(Error::Validation {
                message: format!(
                    "Unknown role '{other}' (expected admin, manager, security or cashier)"
                ),
            }),
        }
    }
}

/// User database model. The password hash is never serialized.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across all users
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string or legacy SHA-256 hex digest
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Role of the account
    pub role: Role,
    /// Online-status flag: 1 while the user has a live session, 0 otherwise
    pub status: i32,
    /// When the account was created
    pub created_at: DateTimeUtc,
    /// When the account was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many sessions
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_role_parses_case_insensitively() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" cashier ".parse::<Role>().unwrap(), Role::Cashier);
        assert_eq!("SECURITY".parse::<Role>().unwrap(), Role::Security);
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        let result = "supervisor".parse::<Role>();
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(json, "\"manager\"");
        assert_eq!(Role::Manager.to_string(), "manager");
    }
}
