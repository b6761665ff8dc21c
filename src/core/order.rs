//! Order placement business logic.
//!
//! An order is written as one transaction header, one item row per line, and one
//! audit entry, all inside a single database transaction. Nothing is visible to
//! other connections until all three writes have succeeded.

use crate::{
    core::{audit, money},
    entities::{Transaction, TransactionItem, transaction, transaction_item},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Serialize;

/// Status stored when the client does not send an order type.
pub const DEFAULT_ORDER_STATUS: &str = "Completed";

/// One line of an incoming order.
#[derive(Debug, Clone)]
pub struct OrderLine {
    /// Product name as shown on the receipt
    pub name: String,
    /// Units sold, at least 1
    pub quantity: i32,
    /// Unit price at the time of sale
    pub price: Decimal,
}

/// An order as submitted by the cashier screen.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Client-generated reference, unique across all orders
    pub reference_number: String,
    /// Amount due for the whole order
    pub total_cost: Decimal,
    /// Cash handed over, at least `total_cost`
    pub cash_paid: Decimal,
    /// Change returned to the customer
    pub change: Decimal,
    /// Lines of the order, at least one
    pub items: Vec<OrderLine>,
    /// Username of the cashier ringing up the sale
    pub cashier: String,
    /// Order type such as "Dine In"; stored as the order status
    pub order_type: Option<String>,
}

/// A stored order together with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// The order header
    pub transaction: transaction::Model,
    /// Its lines in entry order
    pub items: Vec<transaction_item::Model>,
}

struct CheckedLine {
    name: String,
    quantity: i32,
    price_cents: i64,
}

struct CheckedOrder {
    reference_number: String,
    total_cost_cents: i64,
    cash_paid_cents: i64,
    change_cents: i64,
    items: Vec<CheckedLine>,
    cashier: String,
    order_status: String,
}

fn check_order(order: NewOrder) -> Result<CheckedOrder> {
    let reference_number = order.reference_number.trim().to_string();
    if reference_number.is_empty() {
        return Err(Error::validation("Reference number is required"));
    }
    let cashier = order.cashier.trim().to_string();
    if cashier.is_empty() {
        return Err(Error::validation("Cashier is required"));
    }
    if order.items.is_empty() {
        return Err(Error::validation("Order must contain at least one item"));
    }

    let total_cost_cents = money::to_cents("Total cost", order.total_cost)?;
    let cash_paid_cents = money::to_cents("Cash paid", order.cash_paid)?;
    let change_cents = money::to_cents("Change", order.change)?;
    if cash_paid_cents < total_cost_cents {
        return Err(Error::validation("Cash paid is less than the total cost"));
    }

    let mut items = Vec::with_capacity(order.items.len());
    for line in order.items {
        let name = line.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Item name cannot be empty"));
        }
        if line.quantity < 1 {
            return Err(Error::validation(format!(
                "Quantity for {name} must be at least 1"
            )));
        }
        let price_cents = money::to_cents("Item price", line.price)?;
        items.push(CheckedLine {
            name,
            quantity: line.quantity,
            price_cents,
        });
    }

    let order_status = order
        .order_type
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_string());

    Ok(CheckedOrder {
        reference_number,
        total_cost_cents,
        cash_paid_cents,
        change_cents,
        items,
        cashier,
        order_status,
    })
}

/// Validates and stores an order atomically.
///
/// # Errors
/// Returns an error if:
/// - A field is missing or out of range
/// - The reference number was already used ([`Error::DuplicateReference`])
/// - Any database write fails, in which case nothing is stored
pub async fn place_order(db: &DatabaseConnection, order: NewOrder) -> Result<Receipt> {
    let order = check_order(order)?;
    let reference = order.reference_number.clone();

    let txn = db.begin().await?;

    let header = transaction::ActiveModel {
        reference_number: Set(order.reference_number),
        total_cost_cents: Set(order.total_cost_cents),
        cash_paid_cents: Set(order.cash_paid_cents),
        change_cents: Set(order.change_cents),
        order_status: Set(order.order_status),
        cashier: Set(order.cashier.clone()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        Error::on_unique_violation(e, || Error::DuplicateReference {
            reference: reference.clone(),
        })
    })?;

    let lines = order.items.into_iter().map(|line| transaction_item::ActiveModel {
        transaction_id: Set(header.id),
        product_name: Set(line.name),
        quantity: Set(line.quantity),
        price_at_sale_cents: Set(line.price_cents),
        ..Default::default()
    });
    TransactionItem::insert_many(lines).exec(&txn).await?;

    audit::record(&txn, &order.cashier, format!("Processed order {reference}")).await?;

    let items = header
        .find_related(TransactionItem)
        .order_by_asc(transaction_item::Column::Id)
        .all(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        reference = %header.reference_number,
        total = %header.total_cost(),
        items = items.len(),
        cashier = %header.cashier,
        "order placed"
    );
    Ok(Receipt {
        transaction: header,
        items,
    })
}

/// Loads a stored order by reference number, for reprinting a receipt.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] if no order has that reference.
pub async fn get_order(db: &DatabaseConnection, reference: &str) -> Result<Receipt> {
    let header = Transaction::find()
        .filter(transaction::Column::ReferenceNumber.eq(reference.trim()))
        .one(db)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            reference: reference.trim().to_string(),
        })?;

    let items = header
        .find_related(TransactionItem)
        .order_by_asc(transaction_item::Column::Id)
        .all(db)
        .await?;

    Ok(Receipt {
        transaction: header,
        items,
    })
}

/// Returns the `limit` most recent orders, newest first.
pub async fn latest_transactions(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
