//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use bookstack_core::{BookId, Email, OrderId, OrderItemId, OrderStatus};

/// A persisted order with its items (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer display name.
    pub customer_name: String,
    /// Customer contact email.
    pub email: Email,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional delivery address.
    pub address: Option<String>,
    /// Optional postal code.
    pub postal_code: Option<String>,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Client-supplied total, inclusive of any extra charges.
    ///
    /// This is deliberately NOT recomputed from the item prices; tax or
    /// shipping may make it differ from the item sum.
    pub total_price: Decimal,
    /// Creation timestamp. Immutable.
    pub created_at: DateTime<Utc>,
    /// Order lines.
    pub items: Vec<OrderItem>,
}

/// A single order line (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced book. The book row may no longer exist.
    pub book_id: BookId,
    /// Units purchased. Always positive.
    pub quantity: i64,
    /// Frozen snapshot of the book's price at checkout time.
    ///
    /// Must never be recomputed from the current book price.
    pub price_at_purchase: Decimal,
}

/// Checkout input: a validated-later request to create an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    /// Raw email; validated during checkout before any mutation.
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    /// Client-supplied price-inclusive total.
    pub total_price: Decimal,
    pub items: Vec<NewOrderItem>,
}

/// One requested order line.
#[derive(Debug, Clone, Copy)]
pub struct NewOrderItem {
    pub book_id: BookId,
    pub quantity: i64,
}
