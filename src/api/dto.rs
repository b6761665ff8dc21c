//! Request bodies.
//!
//! Field names follow the browser client: camelCase for orders and users, with
//! snake_case accepted as an alias. Text fields default to empty so a missing field
//! reaches validation and comes back as a 400 with a readable message.

use crate::{
    core::{
        order::{NewOrder, OrderLine},
        user::{NewUser, UserUpdate},
    },
    entities::Role,
    errors::Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientId {
    Number(i64),
    Text(String),
}

/// Reads an id sent either as a JSON number or as a numeric string.
/// A blank string counts as absent.
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LenientId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LenientId::Number(id)) => Ok(Some(id)),
        Some(LenientId::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(LenientId::Text(raw)) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid id {raw:?}"))),
    }
}

/// Body of `/api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Plaintext password
    #[serde(default)]
    pub password: String,
}

/// Body of `/api/logout`; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    /// Account to sign out, as a number or a numeric string
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
}

/// One line of an order body.
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    /// Product name
    #[serde(default)]
    pub name: String,
    /// Units sold
    pub quantity: i32,
    /// Unit price, number or string
    pub price: Decimal,
}

/// Body of `/api/order`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Client-generated reference
    #[serde(default, alias = "reference_number")]
    pub reference_number: String,
    /// Amount due
    #[serde(alias = "total_cost")]
    pub total_cost: Decimal,
    /// Cash handed over
    #[serde(alias = "cash_paid")]
    pub cash_paid: Decimal,
    /// Change returned
    pub change: Decimal,
    /// Order lines
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    /// Username of the cashier
    #[serde(default)]
    pub cashier: String,
    /// Order type such as "Take Out"
    #[serde(default, alias = "order_type")]
    pub order_type: Option<String>,
}

impl From<OrderRequest> for NewOrder {
    fn from(req: OrderRequest) -> Self {
        Self {
            reference_number: req.reference_number,
            total_cost: req.total_cost,
            cash_paid: req.cash_paid,
            change: req.change,
            items: req
                .items
                .into_iter()
                .map(|item| OrderLine {
                    name: item.name,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            cashier: req.cashier,
            order_type: req.order_type,
        }
    }
}

/// Body of `/api/users/add`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Plaintext password
    #[serde(default)]
    pub password: String,
    /// Given name
    #[serde(default, alias = "first_name")]
    pub first_name: String,
    /// Family name
    #[serde(default, alias = "last_name")]
    pub last_name: String,
    /// Role name, matched case-insensitively
    #[serde(default)]
    pub role: String,
}

impl CreateUserRequest {
    /// Validates the role and converts into the core input.
    pub fn into_new_user(self) -> Result<NewUser> {
        Ok(NewUser {
            role: self.role.parse::<Role>()?,
            username: self.username,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

/// Body of `/api/users/update`. An empty or missing password keeps the old one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Account to edit
    pub id: i64,
    /// New login name
    #[serde(default)]
    pub username: String,
    /// New given name
    #[serde(default, alias = "first_name")]
    pub first_name: String,
    /// New family name
    #[serde(default, alias = "last_name")]
    pub last_name: String,
    /// New role name
    #[serde(default)]
    pub role: String,
    /// New password, optional
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Validates the role and converts into the core input.
    pub fn into_update(self) -> Result<UserUpdate> {
        Ok(UserUpdate {
            role: self.role.parse::<Role>()?,
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            password: self.password,
        })
    }
}

/// Body of the delete endpoints.
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    /// Row to delete, as a number or a numeric string
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
}

/// Body of `/api/categories/add`.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    /// Category name
    #[serde(default)]
    pub name: String,
}

/// Body of `/api/categories/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// Category to rename
    pub id: i64,
    /// New name
    #[serde(default)]
    pub name: String,
}

/// Body of `/api/products/add` and `/api/add-product`.
///
/// The category is given either by id or by name; a name that does not exist
/// yet creates the category.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Existing category id
    #[serde(default, alias = "categoryId")]
    pub category_id: Option<i64>,
    /// Category name, created when missing
    #[serde(default)]
    pub category: Option<String>,
    /// Product name
    #[serde(default)]
    pub name: String,
    /// Unit price, number or string
    pub price: Decimal,
}

/// Body of `/api/products/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    /// Product to edit
    pub id: i64,
    /// New name
    #[serde(default)]
    pub name: String,
    /// New unit price
    pub price: Decimal,
    /// Category to move the product to
    #[serde(default, alias = "categoryId")]
    pub category_id: Option<i64>,
}
