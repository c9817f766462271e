//! Domain managers.
//!
//! One manager per collection, layering validation and composition rules on
//! the generic store: required-field checks, code/email uniqueness, quantity
//! aggregation, password hashing. Managers translate store-level failures
//! into domain errors only where they can attach meaning; raw I/O failures
//! propagate unchanged to the boundary.

pub mod carts;
pub mod products;
pub mod users;

pub use carts::CartManager;
pub use products::ProductManager;
pub use users::UserManager;

use std::fmt::Display;

use crate::store::StoreError;

/// Errors produced by the domain managers.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Caller-fixable input problem (missing/invalid field, uniqueness clash).
    #[error("{0}")]
    Validation(String),

    /// The referenced entity does not exist.
    #[error("{what} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"product"`.
        what: &'static str,
        /// Identifier as presented by the caller.
        id: String,
    },

    /// Store-level failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing failed.
    #[error("password hashing failed")]
    Hash,
}

impl DomainError {
    /// Shorthand for a not-found error.
    pub fn not_found(what: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            what,
            id: id.to_string(),
        }
    }

    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
