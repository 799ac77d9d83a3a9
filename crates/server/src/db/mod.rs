//! Database operations for the Bookstack `SQLite` store.
//!
//! ## Tables
//!
//! - `book` - Catalog entries (price, stock)
//! - `orders` - Order headers
//! - `order_item` - Order lines with frozen purchase prices
//! - `admin_user` - Admin accounts (argon2 password hashes)
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are embedded via
//! [`MIGRATOR`]; the server runs them at startup.

pub mod admins;
pub mod books;
pub mod orders;

use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use admins::AdminRepository;
pub use books::BookRepository;
pub use orders::OrderLedger;

/// Embedded database migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Enables WAL journaling and foreign keys, and creates the database
/// file if it does not exist yet.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options: SqliteConnectOptions = database_url.expose_secret().parse()?;
    let options = options
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Parse a decimal column stored as TEXT.
///
/// `SQLite` has no decimal type, so exact prices are stored as strings.
pub(crate) fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, RepositoryError> {
    raw.parse().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid decimal in column {column}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_valid() {
        let d = parse_decimal("price", "19.99").expect("valid decimal");
        assert_eq!(d.to_string(), "19.99");
    }

    #[test]
    fn test_parse_decimal_corrupt() {
        let err = parse_decimal("price", "not-a-number").expect_err("must fail");
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
