//! Book repository: the catalog accessor.
//!
//! Read access for the catalog endpoints plus creation for seeding.
//! Stock adjustments happen inside [`super::OrderLedger`] transactions,
//! never here.

use sqlx::SqlitePool;

use bookstack_core::BookId;

use super::{RepositoryError, parse_decimal};
use crate::models::{Book, NewBook};

/// Internal row type for book queries.
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    description: Option<String>,
    price: String,
    stock: i64,
    isbn: Option<String>,
    published_year: Option<i64>,
}

impl TryFrom<BookRow> for Book {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookId::new(row.id),
            title: row.title,
            description: row.description,
            price: parse_decimal("book.price", &row.price)?,
            stock: row.stock,
            isbn: row.isbn,
            published_year: row.published_year,
        })
    }
}

/// Repository for book database operations.
pub struct BookRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookRepository<'a> {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all books, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, description, price, stock, isbn, published_year
             FROM book
             ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a book by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    pub async fn get_by_id(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, description, price, stock, isbn, published_year
             FROM book
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new book.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the ISBN already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewBook) -> Result<Book, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            "INSERT INTO book (title, description, price, stock, isbn, published_year)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, title, description, price, stock, isbn, published_year",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price.to_string())
        .bind(input.stock)
        .bind(&input.isbn)
        .bind(input.published_year)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("isbn already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }
}
