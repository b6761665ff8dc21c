//! Transaction entity - One completed sale.
//!
//! Each transaction has a client-generated `reference_number`, the money totals
//! of the sale, the order type, and the `cashier` who rang it up. Transactions
//! are written once together with their items and are never updated. Amounts
//! are stored as whole cents.
use crate::core::money;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Client-generated reference (e.g., `"TX-1001"`), unique
    #[sea_orm(unique)]
    pub reference_number: String,
    /// Amount due for the whole order, in cents
    #[serde(rename = "total_cost", serialize_with = "money::serialize_cents")]
    pub total_cost_cents: i64,
    /// Cash handed over by the customer, in cents
    #[serde(rename = "cash_paid", serialize_with = "money::serialize_cents")]
    pub cash_paid_cents: i64,
    /// Change returned to the customer, in cents
    #[serde(rename = "change_amount", serialize_with = "money::serialize_cents")]
    pub change_cents: i64,
    /// Order type as entered at the till (e.g., `"Dine In"`), `"Completed"` by default
    pub order_status: String,
    /// Username of the cashier who placed the order
    pub cashier: String,
    /// When the sale was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One transaction has many line items
    #[sea_orm(has_many = "super::transaction_item::Entity")]
    Items,
}

impl Related<super::transaction_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Model {
    /// Amount due as a two-place amount.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        money::from_cents(self.total_cost_cents)
    }
}

impl ActiveModelBehavior for ActiveModel {}
