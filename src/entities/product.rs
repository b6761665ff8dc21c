//! Product entity - Items sold at a fixed price.
//!
//! Each product belongs to exactly one category and is deleted with it.
//! Prices are stored as whole cents; order lines copy the name and price at
//! sale time, so editing or deleting a product never rewrites history.

use crate::core::money;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the category this product is listed under
    pub category_id: i64,
    /// Name of the product (e.g., "Coke", "Burger")
    pub name: String,
    /// Unit price in cents, sent to clients as `"price": "50.00"`
    #[serde(rename = "price", serialize_with = "money::serialize_cents")]
    pub price_cents: i64,
    /// When the product was created
    #[serde(skip)]
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    #[serde(skip)]
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Unit price as a two-place amount.
    #[must_use]
    pub fn price(&self) -> Decimal {
        money::from_cents(self.price_cents)
    }
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
