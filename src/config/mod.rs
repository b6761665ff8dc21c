/// Database configuration and connection management
pub mod database;

/// Initial users and categories loaded from config.toml
pub mod seed;

/// HTTP server settings from environment variables
pub mod server;
