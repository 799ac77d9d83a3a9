//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::db::OrderLedger;
use crate::services::{Argon2Scheme, PasswordScheme, SessionStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; owns the session store and the order
/// ledger so their lifecycle matches the service's.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
    orders: OrderLedger,
    sessions: SessionStore,
    password: Box<dyn PasswordScheme>,
}

impl AppState {
    /// Create application state with the default argon2 password scheme.
    #[must_use]
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Self {
        Self::with_password_scheme(config, pool, Box::new(Argon2Scheme))
    }

    /// Create application state with an injected password scheme.
    #[must_use]
    pub fn with_password_scheme(
        config: ServerConfig,
        pool: SqlitePool,
        password: Box<dyn PasswordScheme>,
    ) -> Self {
        let orders = OrderLedger::new(pool.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                orders,
                sessions: SessionStore::new(),
                password,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the order ledger.
    #[must_use]
    pub fn orders(&self) -> &OrderLedger {
        &self.inner.orders
    }

    /// Get a reference to the admin session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get a reference to the password hashing scheme.
    #[must_use]
    pub fn password(&self) -> &dyn PasswordScheme {
        self.inner.password.as_ref()
    }
}
