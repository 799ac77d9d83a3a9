//! Admin account domain types.

use chrono::{DateTime, Utc};

use bookstack_core::AdminId;

/// An administrator account (domain type).
///
/// The password hash is an argon2 PHC string and never leaves the
/// service layer.
#[derive(Debug, Clone)]
pub struct Admin {
    /// Unique admin ID.
    pub id: AdminId,
    /// Login username.
    pub username: String,
    /// Argon2 password hash (PHC string format).
    pub password_hash: String,
    /// Whether a forced password change is pending (set on seeded accounts).
    pub requires_password_change: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
