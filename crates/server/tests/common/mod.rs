//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use bookstack_server::db::{BookRepository, MIGRATOR};
use bookstack_server::models::{Book, NewBook};

/// Create a migrated in-memory database.
///
/// A single connection is mandatory: every `sqlite::memory:` connection
/// is its own empty database, so a larger pool would scatter state.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid connection string")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory pool");

    MIGRATOR.run(&pool).await.expect("migrations apply");
    pool
}

/// Insert a catalog book with the given price and stock.
pub async fn seed_book(pool: &SqlitePool, title: &str, price: &str, stock: i64) -> Book {
    BookRepository::new(pool)
        .create(&NewBook {
            title: title.to_owned(),
            description: None,
            price: price.parse::<Decimal>().expect("valid price"),
            stock,
            isbn: None,
            published_year: None,
        })
        .await
        .expect("book created")
}

/// Read a book's current stock straight from the table.
pub async fn stock_of(pool: &SqlitePool, book_id: i64) -> i64 {
    let (stock,): (i64,) = sqlx::query_as("SELECT stock FROM book WHERE id = ?")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("book exists");
    stock
}

/// Count rows in a table.
pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count query");
    count
}
