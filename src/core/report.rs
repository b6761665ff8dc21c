//! Sales report business logic.
//!
//! Read-only aggregations for the admin dashboard. Sums and counts run in `SQLite`
//! over the integer cent columns, so a report never loads order rows into memory.
//! Days are UTC calendar days. Every report returns zeros or empty lists on an
//! empty database.

use crate::{
    core::{audit, money, order, user as users},
    entities::{
        Product, Transaction, TransactionItem, audit_log, category, product, transaction,
        transaction_item,
    },
    errors::Result,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    JoinType, PaginatorTrait, QueryOrder, QuerySelect, prelude::*,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use serde::Serialize;

/// Number of calendar days covered by [`daily_sales`], today included.
pub const SALES_WINDOW_DAYS: i64 = 7;

/// Rows returned by the history and log views.
pub const LIST_LIMIT: u64 = 100;

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of today's order totals
    #[serde(serialize_with = "crate::core::money::serialize")]
    pub today_revenue: Decimal,
    /// Orders placed since midnight UTC
    pub today_orders: u64,
    /// Orders ever placed
    pub total_orders: u64,
    /// Accounts, online or not
    pub user_count: u64,
}

/// Revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    /// UTC calendar day
    pub date: NaiveDate,
    /// Sum of that day's order totals
    #[serde(serialize_with = "crate::core::money::serialize")]
    pub total: Decimal,
}

/// Revenue attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySales {
    /// Category name
    pub category: String,
    /// Sum of quantity times sale price over matching order lines
    #[serde(serialize_with = "crate::core::money::serialize")]
    pub total_sales: Decimal,
}

/// Midnight UTC of the day containing `now`.
#[must_use]
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Calendar day of a stored timestamp, as `YYYY-MM-DD`.
fn sale_day() -> SimpleExpr {
    Expr::cust("DATE(\"transactions\".\"created_at\")")
}

/// Today's revenue and order count, lifetime order count, and account count.
pub async fn dashboard_stats(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<DashboardStats> {
    let (revenue_cents, today_orders): (Option<i64>, i64) = Transaction::find()
        .select_only()
        .column_as(transaction::Column::TotalCostCents.sum(), "revenue")
        .column_as(transaction::Column::Id.count(), "orders")
        .filter(transaction::Column::CreatedAt.gte(start_of_day(now)))
        .into_tuple()
        .one(db)
        .await?
        .unwrap_or((None, 0));

    Ok(DashboardStats {
        today_revenue: money::from_cents(revenue_cents.unwrap_or(0)),
        today_orders: u64::try_from(today_orders).unwrap_or(0),
        total_orders: Transaction::find().count(db).await?,
        user_count: users::count_users(db).await?,
    })
}

/// Revenue per day over the trailing window, oldest first.
///
/// Days without sales are omitted.
pub async fn daily_sales(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<Vec<DailySales>> {
    let window_start = start_of_day(now) - Duration::days(SALES_WINDOW_DAYS - 1);

    let rows: Vec<(NaiveDate, i64)> = Transaction::find()
        .select_only()
        .column_as(sale_day(), "day")
        .column_as(transaction::Column::TotalCostCents.sum(), "total")
        .filter(transaction::Column::CreatedAt.gte(window_start))
        .group_by(sale_day())
        .order_by_asc(sale_day())
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(date, cents)| DailySales {
            date,
            total: money::from_cents(cents),
        })
        .collect())
}

/// Revenue per category, highest first.
///
/// Order lines are joined to catalog products by name. A line whose name no
/// longer exists in the catalog is left out; a name listed under several
/// categories counts toward each of them.
pub async fn sales_by_category(db: &DatabaseConnection) -> Result<Vec<CategorySales>> {
    let line_total = Expr::col((TransactionItem, transaction_item::Column::Quantity))
        .mul(Expr::col((TransactionItem, transaction_item::Column::PriceAtSaleCents)));
    let by_name: RelationDef = TransactionItem::belongs_to(Product)
        .from(transaction_item::Column::ProductName)
        .to(product::Column::Name)
        .into();

    let rows: Vec<(String, i64)> = TransactionItem::find()
        .select_only()
        .column_as(category::Column::Name, "category")
        .column_as(SimpleExpr::from(Func::sum(line_total)), "total_sales")
        .join(JoinType::InnerJoin, by_name)
        .join(JoinType::InnerJoin, product::Relation::Category.def())
        .group_by(category::Column::Name)
        .order_by_desc(SimpleExpr::from(Expr::col(Alias::new("total_sales"))))
        .order_by_asc(category::Column::Name)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(category, cents)| CategorySales {
            category,
            total_sales: money::from_cents(cents),
        })
        .collect())
}

/// The latest orders for the history view.
pub async fn history(db: &DatabaseConnection) -> Result<Vec<transaction::Model>> {
    order::latest_transactions(db, LIST_LIMIT).await
}

/// The latest audit entries for the log view.
pub async fn audit_logs(db: &DatabaseConnection) -> Result<Vec<audit_log::Model>> {
    audit::latest_entries(db, LIST_LIMIT).await
}
