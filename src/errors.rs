//! Unified error types and result handling.

use thiserror::Error;

/// Every failure the POS core can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Anything the database layer reported that has no more specific variant
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A request field is missing or out of range
    #[error("{message}")]
    Validation {
        /// Human-readable reason shown to the client
        message: String,
    },

    /// Unknown username or wrong password; deliberately does not say which
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No user with this id
    #[error("User not found: {id}")]
    UserNotFound {
        /// Requested user id
        id: i64,
    },

    /// No category with this id or name
    #[error("Category not found: {name}")]
    CategoryNotFound {
        /// Requested category id or name
        name: String,
    },

    /// No product with this id
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// No transaction with this reference number
    #[error("Order not found: {reference}")]
    OrderNotFound {
        /// Requested reference number
        reference: String,
    },

    /// Username already taken
    #[error("Username '{username}' already exists")]
    DuplicateUsername {
        /// The conflicting username
        username: String,
    },

    /// Category name already taken
    #[error("Category '{name}' already exists")]
    DuplicateCategory {
        /// The conflicting name
        name: String,
    },

    /// Reference number already used by another transaction
    #[error("Reference number '{reference}' has already been used")]
    DuplicateReference {
        /// The conflicting reference number
        reference: String,
    },

    /// Argon2 could not hash or parse a password hash
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Underlying error text
        message: String,
    },

    /// I/O failure (config files, sockets)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::Validation`] from anything printable.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Turns a unique-constraint violation into the given domain error, passing
    /// every other database error through unchanged.
    pub fn on_unique_violation(err: sea_orm::DbErr, duplicate: impl FnOnce() -> Self) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => duplicate(),
            _ => Self::Database(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
