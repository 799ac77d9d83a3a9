//! Bookstack server library.
//!
//! The HTTP service behind the Bookstack store: catalog reads, order
//! checkout with inventory consistency, bulk order administration, and
//! admin session handling.
//!
//! # Architecture
//!
//! - Axum web framework over a `SQLite` connection pool (sqlx)
//! - `db/` - repositories and the transactional order ledger
//! - `services/` - session store, password hashing, auth orchestration
//! - `routes/` - request/response types and handlers
//! - `middleware/` - the admin session extractor

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
