//! Product business logic.
//!
//! This module provides functions for building the cashier menu and for creating,
//! updating, and deleting products. Prices are rounded to two decimal places
//! before storage and must not be negative.

use crate::{
    core::{audit, category as categories, money},
    entities::{Category, Product, category, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::BTreeMap;

fn clean_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Product name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Returns the menu: category name to products, both ordered by name.
///
/// Categories without products are included with an empty list, so an empty
/// catalog yields an empty map.
pub async fn get_menu(db: &DatabaseConnection) -> Result<BTreeMap<String, Vec<product::Model>>> {
    let rows = Category::find()
        .find_with_related(Product)
        .order_by_asc(category::Column::Name)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(cat, mut items)| {
            items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            (cat.name, items)
        })
        .collect())
}

/// Finds a product by id.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn insert_product<C>(db: &C, category_id: i64, name: String, price_cents: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now();
    product::ActiveModel {
        category_id: Set(category_id),
        name: Set(name),
        price_cents: Set(price_cents),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a product under an existing category.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or the price is negative
/// - The category does not exist
/// - The database insert fails
pub async fn create_product(
    db: &DatabaseConnection,
    category_id: i64,
    name: &str,
    price: Decimal,
    actor: &str,
) -> Result<product::Model> {
    let name = clean_name(name)?;
    let price_cents = money::to_cents("Price", price)?;

    let txn = db.begin().await?;

    let cat = categories::get_category_by_id(&txn, category_id)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?;
    let created = insert_product(&txn, cat.id, name, price_cents).await?;

    audit::record(
        &txn,
        actor,
        format!("Added product {} to {}", created.name, cat.name),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(product_id = created.id, name = %created.name, price = %created.price(), "product created");
    Ok(created)
}

/// Creates a product under the category called `category_name`, creating the
/// category first when it does not exist yet.
///
/// # Errors
/// Returns an error if a name is empty, the price is negative, or a write fails.
pub async fn create_product_in_category(
    db: &DatabaseConnection,
    category_name: &str,
    name: &str,
    price: Decimal,
    actor: &str,
) -> Result<product::Model> {
    let name = clean_name(name)?;
    let price_cents = money::to_cents("Price", price)?;

    let txn = db.begin().await?;

    let (cat, category_created) = categories::find_or_create_category(&txn, category_name).await?;
    if category_created {
        audit::record(&txn, actor, format!("Created category {}", cat.name)).await?;
    }
    let created = insert_product(&txn, cat.id, name, price_cents).await?;
    audit::record(
        &txn,
        actor,
        format!("Added product {} to {}", created.name, cat.name),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(product_id = created.id, category = %cat.name, category_created, "product created");
    Ok(created)
}

/// Updates a product's name and price, optionally moving it to another category.
///
/// # Errors
/// Returns an error if:
/// - The product or target category does not exist
/// - The name is empty or the price is negative
/// - The database update fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    name: &str,
    price: Decimal,
    category_id: Option<i64>,
    actor: &str,
) -> Result<product::Model> {
    let name = clean_name(name)?;
    let price_cents = money::to_cents("Price", price)?;

    let txn = db.begin().await?;

    let mut active: product::ActiveModel = get_product_by_id(&txn, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    if let Some(category_id) = category_id {
        if categories::get_category_by_id(&txn, category_id).await?.is_none() {
            return Err(Error::CategoryNotFound {
                name: category_id.to_string(),
            });
        }
        active.category_id = Set(category_id);
    }
    active.name = Set(name);
    active.price_cents = Set(price_cents);
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;

    audit::record(&txn, actor, format!("Updated product {}", updated.name)).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Deletes a product.
///
/// # Errors
/// Returns an error if the product does not exist or the delete fails.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64, actor: &str) -> Result<()> {
    let txn = db.begin().await?;

    let existing = get_product_by_id(&txn, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    let name = existing.name.clone();
    existing.delete(&txn).await?;

    audit::record(&txn, actor, format!("Deleted product {name}")).await?;
    txn.commit().await?;

    tracing::info!(product_id, %name, "product deleted");
    Ok(())
}
