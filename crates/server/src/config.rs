//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional and fall back to local-development defaults:
//!
//! - `BOOKSTACK_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://bookstore.db?mode=rwc`)
//! - `BOOKSTACK_HOST` - Bind address (default: 127.0.0.1)
//! - `BOOKSTACK_PORT` - Listen port (default: 8000)
//! - `BOOKSTACK_ADMIN_USERNAME` - Seed admin username (default: admin)
//! - `BOOKSTACK_ADMIN_PASSWORD` - Seed admin password (default: admin;
//!   the seeded account is flagged for a forced password change)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `BOOKSTACK_LOG_FORMAT` - `json` for structured logs, text otherwise

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Bookstack server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `SQLite` connection string.
    pub database_url: SecretString,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Username for the seeded admin account.
    pub admin_username: String,
    /// Password for the seeded admin account.
    pub admin_password: SecretString,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("BOOKSTACK_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://bookstore.db?mode=rwc".to_owned());

        let host = parse_var("BOOKSTACK_HOST")?.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let port = parse_var("BOOKSTACK_PORT")?.unwrap_or(8000);

        let admin_username =
            std::env::var("BOOKSTACK_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_owned());
        let admin_password =
            std::env::var("BOOKSTACK_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_owned());

        let sentry_dsn = std::env::var("SENTRY_DSN").ok();

        Ok(Self {
            database_url: database_url.into(),
            host,
            port,
            admin_username,
            admin_password: admin_password.into(),
            sentry_dsn,
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse an optional environment variable into `T`.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string())),
        Err(_) => Ok(None),
    }
}
