//! HTTP routes.

pub mod admin;
pub mod books;
pub mod orders;

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(books::list_books))
        .route("/books/{id}", get(books::get_book))
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/orders/bulk-status", put(orders::bulk_update_status))
        .route("/orders/bulk-delete", delete(orders::bulk_delete))
        .route("/orders/{id}", get(orders::get_order))
        .route("/admin/login", post(admin::login))
        .route("/admin/change-password", post(admin::change_password))
        .route("/admin/verify", get(admin::verify))
        .route("/admin/logout", post(admin::logout))
}
