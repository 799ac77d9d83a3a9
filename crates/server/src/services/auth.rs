//! Admin authentication service.
//!
//! Orchestrates password verification against stored credentials and
//! session lifecycle in the [`SessionStore`]. Login failures are
//! deliberately indistinguishable between unknown-user and wrong-password
//! to prevent username enumeration.

use sqlx::SqlitePool;
use thiserror::Error;

use bookstack_core::AdminId;

use crate::db::{AdminRepository, RepositoryError};
use crate::services::password::{PasswordError, PasswordScheme};
use crate::services::sessions::SessionStore;

/// Errors produced by authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. One variant for both causes.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Missing, unknown, or logged-out session token.
    #[error("invalid or expired session token")]
    InvalidToken,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Password hashing failure.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The freshly minted session token.
    pub session_token: String,
    /// Whether the account is flagged for a forced password change.
    pub requires_password_change: bool,
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    admins: AdminRepository<'a>,
    sessions: &'a SessionStore,
    scheme: &'a dyn PasswordScheme,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(
        pool: &'a SqlitePool,
        sessions: &'a SessionStore,
        scheme: &'a dyn PasswordScheme,
    ) -> Self {
        Self {
            admins: AdminRepository::new(pool),
            sessions,
            scheme,
        }
    }

    /// Verify credentials and mint a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on unknown username or
    /// password mismatch, `AuthError::Repository` on database failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let admin = self
            .admins
            .get_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.scheme.verify(password, &admin.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let session_token = self.sessions.create(admin.id);
        tracing::info!(admin_id = %admin.id, "admin logged in");

        Ok(LoginOutcome {
            session_token,
            requires_password_change: admin.requires_password_change,
        })
    }

    /// Change the password behind an active session.
    ///
    /// Re-verifies the old password, stores a fresh hash, clears the
    /// forced-change flag, and rotates the session token. Returns the
    /// replacement token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the session is not active or
    /// the admin row is gone, `AuthError::InvalidCredentials` if the old
    /// password does not match.
    pub async fn change_password(
        &self,
        token: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<String, AuthError> {
        let admin_id = self.sessions.get(token).ok_or(AuthError::InvalidToken)?;
        let admin = self
            .admins
            .get_by_id(admin_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !self.scheme.verify(old_password, &admin.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let hash = self.scheme.hash(new_password)?;
        self.admins.update_password(admin.id, &hash).await?;

        let rotated = self.sessions.rotate(token).ok_or(AuthError::InvalidToken)?;
        tracing::info!(admin_id = %admin.id, "admin password changed");
        Ok(rotated)
    }

    /// Look up the admin behind a session token, if any.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<AdminId> {
        self.sessions.get(token)
    }

    /// Drop a session. Idempotent.
    pub fn logout(&self, token: &str) {
        if self.sessions.remove(token) {
            tracing::info!("admin logged out");
        }
    }

    /// Seed a default admin account when none exists yet.
    ///
    /// The seeded account is flagged for a forced password change.
    /// Returns whether an account was created.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` on database failure and
    /// `AuthError::Password` if hashing fails.
    pub async fn seed_default(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        if self.admins.count().await? > 0 {
            return Ok(false);
        }

        let hash = self.scheme.hash(password)?;
        self.admins.create(username, &hash, true).await?;
        tracing::info!(username, "seeded default admin account");
        Ok(true)
    }
}
