//! Catalog read handlers.

use axum::Json;
use axum::extract::{Path, State};

use bookstack_core::BookId;

use crate::db::BookRepository;
use crate::error::AppError;
use crate::models::Book;
use crate::state::AppState;

/// `GET /books` - list the catalog.
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = BookRepository::new(state.pool()).list_all().await?;
    Ok(Json(books))
}

/// `GET /books/{id}` - fetch one book.
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    let book = BookRepository::new(state.pool())
        .get_by_id(BookId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("book {id} not found")))?;
    Ok(Json(book))
}
