//! Runtime configuration and validation limits.
//!
//! Values come from the environment (optionally seeded from a `.env` file).

use std::net::SocketAddr;
use thiserror::Error;

/// Address the HTTP server binds to when `SET_DESIGNER_ADDR` is unset
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Tracing filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "set_designer=debug,tower_http=debug";

/// Upper bound for a set's target size and for any single target.
/// Grid responses allocate one entry per target card.
pub const MAX_TOTAL_CARDS: u32 = 2_000;

/// Maximum length of set, card and archetype names
pub const MAX_NAME_LENGTH: usize = 100;

/// Column widths of the card and archetype tables, in characters
pub const MAX_MANA_COST_LENGTH: usize = 50;
pub const MAX_TYPE_LINE_LENGTH: usize = 100;
pub const MAX_STAT_LENGTH: usize = 10;
pub const MAX_TITLE_LENGTH: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{0}'")]
    InvalidBindAddr(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string; in-memory storage when absent
    pub database_url: Option<String>,
    /// Whether a `.env` file was found and applied
    pub env_file_loaded: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Runs before tracing is installed, so the result is reported by the caller
        let env_file_loaded = dotenv::dotenv().is_ok();

        let config = Self::from_values(
            std::env::var("SET_DESIGNER_ADDR").ok(),
            std::env::var("DATABASE_URL").ok(),
        )?;
        Ok(Self {
            env_file_loaded,
            ..config
        })
    }

    pub fn from_values(
        bind_addr: Option<String>,
        database_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw_addr = bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        Ok(Self {
            bind_addr,
            database_url: database_url.filter(|url| !url.trim().is_empty()),
            env_file_loaded: false,
        })
    }
}
