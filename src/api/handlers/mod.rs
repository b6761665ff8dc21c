/// Login and logout
pub mod auth;
/// Menu, categories, and products
pub mod catalog;
/// Liveness probe
pub mod health;
/// Order placement and receipt lookup
pub mod order;
/// Dashboard, charts, history, and logs
pub mod reports;
/// User administration
pub mod users;
