//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{AuditLog, Category, Product, Session, Transaction, TransactionItem, User};
use crate::errors::{Error, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
    sea_query::TableCreateStatement,
};
use std::path::Path;

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/pos.sqlite?mode=rwc";

/// Directory that must exist before `SQLite` can create the database file.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

/// Establishes a connection to the database at `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(dir) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(dir).map_err(|e| Error::Config {
            message: format!("Failed to create database directory {}: {e}", dir.display()),
        })?;
    }

    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    Database::connect(options).await.map_err(Into::into)
}

/// Opens a private in-memory database on a single pooled connection.
///
/// Every connection to `sqlite::memory:` is a separate database, so the pool is
/// capped at one.
pub async fn connect_in_memory() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(options).await.map_err(Into::into)
}

fn table_for<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    table
}

/// Creates all tables that do not exist yet.
///
/// Parents are created before children so foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        table_for(&schema, User),
        table_for(&schema, Session),
        table_for(&schema, Category),
        table_for(&schema, Product),
        table_for(&schema, Transaction),
        table_for(&schema, TransactionItem),
        table_for(&schema, AuditLog),
    ];

    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    Ok(())
}
