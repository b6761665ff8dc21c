//! Shared test utilities.
//!
//! This module provides helpers for setting up an in-memory test database and
//! creating test entities with sensible defaults.

use crate::{
    core::{
        order::{NewOrder, OrderLine},
        password,
        user as users,
    },
    entities::{self, Role, category, product, transaction},
    errors::Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::connect_in_memory().await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a user whose password is stored as an argon2 hash.
///
/// # Defaults
/// * `first_name`: "Test"
/// * `last_name`: the username
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    password_plain: &str,
    role: Role,
) -> Result<entities::user::Model> {
    let hash = password::hash_password(password_plain)?;
    users::insert_user_with_hash(db, username, hash, "Test", username, role).await
}

/// Creates a user whose password is stored as a legacy SHA-256 digest.
pub async fn create_legacy_user(
    db: &DatabaseConnection,
    username: &str,
    password_plain: &str,
    role: Role,
) -> Result<entities::user::Model> {
    let digest = password::legacy_digest(password_plain);
    users::insert_user_with_hash(db, username, digest, "Legacy", username, role).await
}

/// Creates a category without writing an audit entry.
pub async fn create_test_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a product with a whole-number price, without writing an audit entry.
pub async fn create_test_product(
    db: &DatabaseConnection,
    category_id: i64,
    name: &str,
    price: i64,
) -> Result<product::Model> {
    let now = Utc::now();
    product::ActiveModel {
        category_id: Set(category_id),
        name: Set(name.to_string()),
        price_cents: Set(price * 100),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Builds an order from `(name, quantity, unit price)` lines.
///
/// # Defaults
/// * `total_cost` and `cash_paid`: the sum of the lines
/// * `change`: 0
/// * `cashier`: "cashier"
/// * `order_type`: None
#[must_use]
pub fn sample_order(reference: &str, lines: &[(&str, i32, i64)]) -> NewOrder {
    let items: Vec<OrderLine> = lines
        .iter()
        .map(|(name, quantity, price)| OrderLine {
            name: (*name).to_string(),
            quantity: *quantity,
            price: Decimal::from(*price),
        })
        .collect();
    let total: Decimal = items
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum();

    NewOrder {
        reference_number: reference.to_string(),
        total_cost: total,
        cash_paid: total,
        change: Decimal::ZERO,
        items,
        cashier: "cashier".to_string(),
        order_type: None,
    }
}

/// Inserts a bare transaction header with a fixed timestamp, for report tests.
pub async fn insert_transaction_at(
    db: &DatabaseConnection,
    reference: &str,
    total: i64,
    at: DateTime<Utc>,
) -> Result<transaction::Model> {
    transaction::ActiveModel {
        reference_number: Set(reference.to_string()),
        total_cost_cents: Set(total * 100),
        cash_paid_cents: Set(total * 100),
        change_cents: Set(0),
        order_status: Set("Completed".to_string()),
        cashier: Set("cashier".to_string()),
        created_at: Set(at),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
