//! HTTP server settings.
//!
//! Read from environment variables (after `.env` has been loaded). Every setting
//! has a default, so an empty environment yields a working configuration.

use crate::errors::{Error, Result};
use std::{net::SocketAddr, path::PathBuf};

/// Longest accepted `SESSION_TTL_HOURS` (366 days).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to listen on (`BIND_ADDRESS`, default `0.0.0.0`)
    pub bind_address: String,
    /// TCP port (`PORT`, default 8000)
    pub port: u16,
    /// Lifetime of a login session (`SESSION_TTL_HOURS`, default 12)
    pub session_ttl: chrono::Duration,
    /// Seed file with initial users and categories (`SEED_CONFIG`, default `config.toml`)
    pub seed_config: PathBuf,
    /// Database connection string (`DATABASE_URL`)
    pub database_url: String,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| Error::Config {
                message: format!("Invalid PORT {raw:?}: {e}"),
            })?,
            None => 8000,
        };

        let ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=MAX_SESSION_TTL_HOURS).contains(hours))
                .ok_or_else(|| Error::Config {
                    message: format!(
                        "SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}, got {raw:?}"
                    ),
                })?,
            None => 12,
        };
        let session_ttl = chrono::Duration::try_hours(ttl_hours).ok_or_else(|| Error::Config {
            message: format!("SESSION_TTL_HOURS {ttl_hours} is out of range"),
        })?;

        let seed_config = lookup("SEED_CONFIG").map_or_else(|| PathBuf::from("config.toml"), PathBuf::from);
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| super::database::DEFAULT_DATABASE_URL.to_string());

        Ok(Self {
            bind_address,
            port,
            session_ttl,
            seed_config,
            database_url,
        })
    }

    /// Socket address to bind the listener to.
    pub fn socket_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid bind address {}:{}: {e}", self.bind_address, self.port),
            })
    }
}
