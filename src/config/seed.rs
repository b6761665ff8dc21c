//! Initial data loading from config.toml
//!
//! The seed file lists accounts and categories that must exist on startup. Seeding
//! only inserts what is missing, so it runs safely on every boot. A seed account may
//! carry a plaintext password (hashed with argon2) or a legacy SHA-256 digest, which
//! is upgraded on that account's first login.

use crate::{
    core::{category as categories, password, user as users},
    entities::Role,
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Accounts to create when missing
    #[serde(default)]
    pub users: Vec<SeedUser>,
    /// Categories to create when missing
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

/// One seed account
#[derive(Debug, Deserialize, Clone)]
pub struct SeedUser {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: Option<String>,
    /// Lowercase hex SHA-256 of the password, for legacy accounts
    pub password_sha256: Option<String>,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// One of admin, manager, security, cashier
    pub role: String,
}

/// One seed category
#[derive(Debug, Deserialize, Clone)]
pub struct SeedCategory {
    /// Category name
    pub name: String,
}

/// What a seeding run inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Accounts created
    pub users_created: usize,
    /// Categories created
    pub categories_created: usize,
}

impl SeedUser {
    fn password_hash(&self) -> Result<String> {
        match (&self.password, &self.password_sha256) {
            (Some(plain), None) if !plain.is_empty() => password::hash_password(plain),
            (None, Some(digest))
                if digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit()) =>
            {
                Ok(digest.to_ascii_lowercase())
            }
            _ => Err(Error::Config {
                message: format!(
                    "Seed user {} needs either a password or a 64-character password_sha256",
                    self.username
                ),
            }),
        }
    }
}

/// Loads the seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Inserts the seed accounts and categories that do not exist yet.
///
/// Runs in one database transaction; a bad entry leaves the database untouched.
pub async fn apply_seed(db: &DatabaseConnection, config: &SeedConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    // Validate and hash before opening the transaction
    let mut accounts = Vec::with_capacity(config.users.len());
    for entry in &config.users {
        let role: Role = entry.role.parse().map_err(|_| Error::Config {
            message: format!("Seed user {} has unknown role {:?}", entry.username, entry.role),
        })?;
        accounts.push((entry, role));
    }

    let txn = db.begin().await?;

    for (entry, role) in accounts {
        if users::get_user_by_username(&txn, entry.username.trim())
            .await?
            .is_some()
        {
            continue;
        }
        let hash = entry.password_hash()?;
        users::insert_user_with_hash(
            &txn,
            &entry.username,
            hash,
            &entry.first_name,
            &entry.last_name,
            role,
        )
        .await?;
        summary.users_created += 1;
        tracing::info!(username = %entry.username, %role, "seeded user");
    }

    for entry in &config.categories {
        let (_, created) = categories::find_or_create_category(&txn, &entry.name).await?;
        if created {
            summary.categories_created += 1;
        }
    }

    txn.commit().await?;
    Ok(summary)
}
