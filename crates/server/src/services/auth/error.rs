//! Authentication error types.

use thiserror::Error;

use crate::managers::DomainError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (unknown email or wrong password).
    ///
    /// Deliberately covers every login failure so the response never reveals
    /// whether an email is registered.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The presented token is missing, malformed, expired, or refers to a
    /// user that no longer exists.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Token signing failed.
    #[error("token signing failed")]
    TokenEncode,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Domain-layer failure, propagated unchanged.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
