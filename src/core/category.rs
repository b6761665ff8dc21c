//! Category business logic.
//!
//! Categories are unique by name. Deleting a category deletes its products in the
//! same transaction; sold order lines keep their own copy of the product name and
//! are not affected.

use crate::{
    core::audit,
    entities::{Category, Product, category, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

fn clean_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Retrieves all categories ordered alphabetically by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by id.
pub async fn get_category_by_id<C>(db: &C, category_id: i64) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by exact name.
pub async fn get_category_by_name<C>(db: &C, name: &str) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn insert_category<C>(db: &C, name: String) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    category::ActiveModel {
        name: Set(name.clone()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::on_unique_violation(e, || Error::DuplicateCategory { name }))
}

/// Creates a category; the name must not be taken.
///
/// # Errors
/// Returns an error if the name is empty or already exists, or the insert fails.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    actor: &str,
) -> Result<category::Model> {
    let name = clean_name(name)?;

    let txn = db.begin().await?;
    let created = insert_category(&txn, name).await?;
    audit::record(&txn, actor, format!("Created category {}", created.name)).await?;
    txn.commit().await?;

    tracing::info!(category_id = created.id, name = %created.name, "category created");
    Ok(created)
}

/// Returns the category called `name`, creating it when missing.
///
/// The boolean is true when a new row was inserted.
pub async fn find_or_create_category<C>(db: &C, name: &str) -> Result<(category::Model, bool)>
where
    C: ConnectionTrait,
{
    let name = clean_name(name)?;
    if let Some(existing) = get_category_by_name(db, &name).await? {
        return Ok((existing, false));
    }
    let created = insert_category(db, name).await?;
    Ok((created, true))
}

/// Renames a category.
///
/// # Errors
/// Returns an error if the category does not exist, the new name is empty or
/// taken, or the update fails.
pub async fn rename_category(
    db: &DatabaseConnection,
    category_id: i64,
    new_name: &str,
    actor: &str,
) -> Result<category::Model> {
    let name = clean_name(new_name)?;

    let txn = db.begin().await?;

    let existing = get_category_by_id(&txn, category_id)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?;
    let old_name = existing.name.clone();

    let mut active: category::ActiveModel = existing.into();
    active.name = Set(name.clone());
    let updated = active
        .update(&txn)
        .await
        .map_err(|e| Error::on_unique_violation(e, || Error::DuplicateCategory { name }))?;

    audit::record(
        &txn,
        actor,
        format!("Renamed category {old_name} to {}", updated.name),
    )
    .await?;
    txn.commit().await?;

    Ok(updated)
}

/// Deletes a category together with its products.
///
/// Returns the number of products removed.
///
/// # Errors
/// Returns an error if the category does not exist or a delete fails.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64, actor: &str) -> Result<u64> {
    let txn = db.begin().await?;

    let existing = get_category_by_id(&txn, category_id)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?;
    let name = existing.name.clone();

    let removed = Product::delete_many()
        .filter(product::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?
        .rows_affected;
    existing.delete(&txn).await?;

    audit::record(&txn, actor, format!("Deleted category {name}")).await?;
    txn.commit().await?;

    tracing::info!(category_id, %name, products_removed = removed, "category deleted");
    Ok(removed)
}
