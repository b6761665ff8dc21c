//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod audit_log;
pub mod category;
pub mod product;
pub mod session;
pub mod transaction;
pub mod transaction_item;
pub mod user;

// Re-export specific types to avoid conflicts
pub use audit_log::{Column as AuditLogColumn, Entity as AuditLog, Model as AuditLogModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use transaction_item::{
    Column as TransactionItemColumn, Entity as TransactionItem, Model as TransactionItemModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
