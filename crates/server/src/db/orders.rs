//! The order ledger: checkout and bulk order adjustments.
//!
//! Every compound operation here (checkout, bulk delete, bulk status
//! update) runs its whole read-validate-write sequence as one sqlx
//! transaction, serialized behind an async write lock. `SQLite` allows a
//! single writer at a time; taking the lock before `BEGIN` keeps
//! concurrent mutations from racing each other into upgrade conflicts,
//! and the guarded stock UPDATEs remain the final authority so stock can
//! never be driven negative.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;
use tokio::sync::Mutex;

use bookstack_core::{BookId, Email, OrderId, OrderItemId, OrderStatus};

use super::{RepositoryError, parse_decimal};
use crate::models::{NewOrder, Order, OrderItem};

/// Errors produced by ledger operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A requested book does not exist in the catalog.
    #[error("book {0} not found")]
    BookNotFound(BookId),

    /// A requested quantity exceeds the book's available stock.
    #[error("insufficient stock for book {book_id}: {available} available, {requested} requested")]
    InsufficientStock {
        book_id: BookId,
        available: i64,
        requested: i64,
    },

    /// The requested status is not a valid order status.
    #[error("invalid order status: {0}")]
    InvalidStatus(String),

    /// A request field failed validation.
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Result of a bulk delete: orders removed and item lines restocked.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BulkDeleteOutcome {
    /// Number of orders deleted.
    pub deleted: u64,
    /// Number of order lines whose quantity was returned to stock.
    /// Lines referencing books that no longer exist are skipped.
    pub returned_items: u64,
}

/// Result of a bulk status update.
#[derive(Debug, Clone, Serialize)]
pub struct BulkStatusOutcome {
    /// Number of orders transitioned.
    pub updated: u64,
    /// The status they were transitioned to.
    pub status: OrderStatus,
}

/// Internal row type for order header queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    email: Email,
    phone: Option<String>,
    address: Option<String>,
    postal_code: Option<String>,
    status: OrderStatus,
    total_price: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        Ok(Order {
            id: OrderId::new(self.id),
            customer_name: self.customer_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            postal_code: self.postal_code,
            status: self.status,
            total_price: parse_decimal("orders.total_price", &self.total_price)?,
            created_at: self.created_at,
            items,
        })
    }
}

/// Internal row type for order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    book_id: i64,
    quantity: i64,
    price_at_purchase: String,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            book_id: BookId::new(row.book_id),
            quantity: row.quantity,
            price_at_purchase: parse_decimal("order_item.price_at_purchase", &row.price_at_purchase)?,
        })
    }
}

/// Price and stock snapshot of one book, read inside the transaction.
#[derive(Debug, sqlx::FromRow)]
struct BookSnapshotRow {
    price: String,
    stock: i64,
}

/// Durable store of orders and their items, plus the stock adjustments
/// that keep the catalog consistent with them.
///
/// Cheap to clone; clones share the pool and the write lock.
#[derive(Clone)]
pub struct OrderLedger {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl OrderLedger {
    /// Create a new ledger over the given pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Validate a checkout request and commit the order, its items, and
    /// the corresponding stock decrements as one atomic unit.
    ///
    /// Duplicate book ids in one request are additive: their quantities
    /// are summed before the stock comparison. `price_at_purchase` is
    /// frozen from the in-transaction snapshot. Any failure rolls back
    /// with zero side effects.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for malformed input,
    /// `OrderError::BookNotFound` for an unresolvable book id,
    /// `OrderError::InsufficientStock` when a summed quantity exceeds
    /// available stock, and `OrderError::Repository` on database failure.
    pub async fn checkout(&self, input: NewOrder) -> Result<Order, OrderError> {
        // All request validation completes before any mutation.
        if input.items.is_empty() {
            return Err(OrderError::Validation {
                field: "items",
                reason: "order must contain at least one item".to_owned(),
            });
        }
        for item in &input.items {
            if item.quantity <= 0 {
                return Err(OrderError::Validation {
                    field: "quantity",
                    reason: format!("quantity must be positive, got {}", item.quantity),
                });
            }
        }
        if input.total_price <= Decimal::ZERO {
            return Err(OrderError::Validation {
                field: "total_price",
                reason: format!("total price must be positive, got {}", input.total_price),
            });
        }
        let email = Email::parse(&input.email).map_err(|e| OrderError::Validation {
            field: "email",
            reason: e.to_string(),
        })?;

        // Duplicate book ids are additive for the stock check.
        let mut requested: BTreeMap<BookId, i64> = BTreeMap::new();
        for item in &input.items {
            *requested.entry(item.book_id).or_default() += item.quantity;
        }

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        // Snapshot price and stock for every referenced book; the check
        // runs against one consistent in-transaction view.
        let mut snapshots: BTreeMap<BookId, (Decimal, i64)> = BTreeMap::new();
        for (&book_id, &quantity) in &requested {
            let row =
                sqlx::query_as::<_, BookSnapshotRow>("SELECT price, stock FROM book WHERE id = ?")
                    .bind(book_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(OrderError::BookNotFound(book_id))?;

            if quantity > row.stock {
                return Err(OrderError::InsufficientStock {
                    book_id,
                    available: row.stock,
                    requested: quantity,
                });
            }

            let price = parse_decimal("book.price", &row.price)?;
            snapshots.insert(book_id, (price, row.stock));
        }

        // Guarded decrement: even without the snapshot check above, this
        // cannot take stock below zero.
        for (&book_id, &quantity) in &requested {
            let result =
                sqlx::query("UPDATE book SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1")
                    .bind(quantity)
                    .bind(book_id)
                    .execute(&mut *tx)
                    .await?;

            if result.rows_affected() == 0 {
                let available = snapshots.get(&book_id).map_or(0, |&(_, stock)| stock);
                return Err(OrderError::InsufficientStock {
                    book_id,
                    available,
                    requested: quantity,
                });
            }
        }

        let created_at = Utc::now();
        let (order_id,): (i64,) = sqlx::query_as(
            "INSERT INTO orders
                 (customer_name, email, phone, address, postal_code, status, total_price, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&input.customer_name)
        .bind(&email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.postal_code)
        .bind(OrderStatus::Pending)
        .bind(input.total_price.to_string())
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;
        let order_id = OrderId::new(order_id);

        // One item per request line, each with the frozen snapshot price.
        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let (price, _) = snapshots[&line.book_id];
            let (item_id,): (i64,) = sqlx::query_as(
                "INSERT INTO order_item (order_id, book_id, quantity, price_at_purchase)
                 VALUES (?, ?, ?, ?)
                 RETURNING id",
            )
            .bind(order_id)
            .bind(line.book_id)
            .bind(line.quantity)
            .bind(price.to_string())
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem {
                id: OrderItemId::new(item_id),
                order_id,
                book_id: line.book_id,
                quantity: line.quantity,
                price_at_purchase: price,
            });
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            lines = items.len(),
            total = %input.total_price,
            "checkout committed"
        );

        Ok(Order {
            id: order_id,
            customer_name: input.customer_name,
            email,
            phone: input.phone,
            address: input.address,
            postal_code: input.postal_code,
            status: OrderStatus::Pending,
            total_price: input.total_price,
            created_at,
            items,
        })
    }

    // =========================================================================
    // Bulk adjustments
    // =========================================================================

    /// Delete orders in bulk, returning each item's quantity to its
    /// book's stock first (compensating transaction).
    ///
    /// Items whose book no longer exists skip the stock return but do
    /// not fail the operation. Already-deleted ids are a no-op and count
    /// as zero. Atomic per invocation.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty id list and
    /// `OrderError::Repository` on database failure.
    pub async fn bulk_delete(&self, order_ids: &[OrderId]) -> Result<BulkDeleteOutcome, OrderError> {
        if order_ids.is_empty() {
            return Err(OrderError::Validation {
                field: "order_ids",
                reason: "order_ids must not be empty".to_owned(),
            });
        }

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT book_id, quantity FROM order_item WHERE order_id IN (",
        );
        push_id_list(&mut query, order_ids);
        query.push(")");
        let lines: Vec<(i64, i64)> = query.build_query_as().fetch_all(&mut *tx).await?;

        let mut returned_items = 0u64;
        for (book_id, quantity) in lines {
            let result = sqlx::query("UPDATE book SET stock = stock + ? WHERE id = ?")
                .bind(quantity)
                .bind(book_id)
                .execute(&mut *tx)
                .await?;

            // The book may have been removed from the catalog since the
            // order was placed; its stock return is skipped.
            if result.rows_affected() > 0 {
                returned_items += 1;
            } else {
                tracing::warn!(book_id, quantity, "skipping stock return for missing book");
            }
        }

        let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM orders WHERE id IN (");
        push_id_list(&mut query, order_ids);
        query.push(")");
        let result = query.build().execute(&mut *tx).await?;

        tx.commit().await?;

        let outcome = BulkDeleteOutcome {
            deleted: result.rows_affected(),
            returned_items,
        };
        tracing::info!(
            deleted = outcome.deleted,
            returned_items = outcome.returned_items,
            "bulk delete committed"
        );
        Ok(outcome)
    }

    /// Transition orders to a new status, all-or-nothing per call.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty id list,
    /// `OrderError::InvalidStatus` for a status outside
    /// {pending, done} (nothing is updated), and
    /// `OrderError::Repository` on database failure.
    pub async fn bulk_update_status(
        &self,
        order_ids: &[OrderId],
        status: &str,
    ) -> Result<BulkStatusOutcome, OrderError> {
        if order_ids.is_empty() {
            return Err(OrderError::Validation {
                field: "order_ids",
                reason: "order_ids must not be empty".to_owned(),
            });
        }
        let status: OrderStatus = status
            .parse()
            .map_err(|e: bookstack_core::ParseOrderStatusError| OrderError::InvalidStatus(e.got))?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE orders SET status = ");
        query.push_bind(status);
        query.push(" WHERE id IN (");
        push_id_list(&mut query, order_ids);
        query.push(")");
        let result = query.build().execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(updated = result.rows_affected(), status = %status, "bulk status update committed");
        Ok(BulkStatusOutcome {
            updated: result.rows_affected(),
            status,
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` on database failure or corrupt rows.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_name, email, phone, address, postal_code, status, total_price, created_at
             FROM orders
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, book_id, quantity, price_at_purchase
             FROM order_item
             WHERE order_id = ?
             ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<OrderItem>, RepositoryError>>()?;

        Ok(Some(row.into_order(items)?))
    }

    /// List all orders with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` on database failure or corrupt rows.
    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_name, email, phone, address, postal_code, status, total_price, created_at
             FROM orders
             ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, book_id, quantity, price_at_purchase
             FROM order_item
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: BTreeMap<i64, Vec<OrderItem>> = BTreeMap::new();
        for row in item_rows {
            let order_id = row.order_id;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(row.try_into()?);
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items).map_err(OrderError::Repository)
            })
            .collect()
    }
}

/// Push a comma-separated bind list of order ids.
fn push_id_list(query: &mut QueryBuilder<'_, Sqlite>, order_ids: &[OrderId]) {
    let mut separated = query.separated(", ");
    for id in order_ids {
        separated.push_bind(id.as_i64());
    }
}
