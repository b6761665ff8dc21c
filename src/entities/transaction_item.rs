//! Transaction item entity - One line of a sale.
//!
//! `product_name` and `price_at_sale_cents` are snapshots taken when the order was
//! placed, not references into the catalog.

use crate::core::money;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Transaction item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "transaction_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the transaction this line belongs to
    pub transaction_id: i64,
    /// Product name as it was at sale time
    pub product_name: String,
    /// Units sold
    pub quantity: i32,
    /// Unit price in cents as it was at sale time
    #[serde(rename = "price_at_sale", serialize_with = "money::serialize_cents")]
    pub price_at_sale_cents: i64,
}

/// Defines relationships between TransactionItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one transaction
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionId",
        to = "super::transaction::Column::Id",
        on_delete = "Cascade"
    )]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
