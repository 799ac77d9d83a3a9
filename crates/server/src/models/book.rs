//! Book domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use bookstack_core::BookId;

/// A catalog book (domain type).
///
/// Stock is only ever mutated through the order ledger's guarded
/// adjustments, never written directly by handlers.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    /// Unique book ID.
    pub id: BookId,
    /// Title of the book.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Current sale price.
    pub price: Decimal,
    /// Sellable units on hand. Never negative.
    pub stock: i64,
    /// Optional ISBN.
    pub isbn: Option<String>,
    /// Optional year of publication.
    pub published_year: Option<i64>,
}

/// Input for creating a catalog book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub isbn: Option<String>,
    pub published_year: Option<i64>,
}
