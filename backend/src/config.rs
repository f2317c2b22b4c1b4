//! Configuration management for the budget ledger server.
//!
//! Configuration is read from environment variables (a `.env` file is loaded
//! first when present):
//! - `DATABASE_URL` - Optional. SQLite URL. Defaults to `sqlite:budget_ledger.db`.
//! - `HOST` - Optional. Bind address. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `CORS_ORIGIN` - Optional. Allowed frontend origin. Defaults to `http://localhost:5173`.
//! - `LOG_FILTER` - Optional. Default tracing filter when `RUST_LOG` is unset. Defaults to `info`.

use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite:budget_ledger.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,

    /// Address the HTTP listener binds to
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Origin allowed by the CORS layer
    pub cors_origin: String,

    /// Fallback filter directive for the tracing subscriber
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `HOST` or `PORT` cannot be parsed
    /// or when `DATABASE_URL` is blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "DATABASE_URL".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let host = lookup("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidValue("HOST".to_string(), e.to_string()))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let log_filter = lookup("LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            database_url,
            host,
            port,
            cors_origin,
            log_filter,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
