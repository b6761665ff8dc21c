/// Audit log appends and queries
pub mod audit;
/// Login, logout, and bearer sessions
pub mod auth;
/// Category CRUD
pub mod category;
/// Fixed-point money helpers
pub mod money;
/// Atomic order placement and receipt lookup
pub mod order;
/// Argon2 and legacy SHA-256 password hashing
pub mod password;
/// Menu and product CRUD
pub mod product;
/// Dashboard and sales reports
pub mod report;
/// User administration
pub mod user;
