//! Domain types for the Bookstack server.

pub mod admin;
pub mod book;
pub mod order;

pub use admin::Admin;
pub use book::{Book, NewBook};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
