//! Service layer: authentication, sessions, and password hashing.

pub mod auth;
pub mod password;
pub mod sessions;

pub use auth::{AdminAuthService, AuthError};
pub use password::{Argon2Scheme, PasswordError, PasswordScheme};
pub use sessions::SessionStore;
