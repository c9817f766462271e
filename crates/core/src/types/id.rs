//! Newtype IDs for type-safe entity references.
//!
//! Every entity identifier is a [`DocumentId`]: either a sequential integer
//! or an opaque UUID, depending on how the owning collection was configured.
//! Use the `define_id!` macro to create type-safe wrappers that prevent
//! accidentally mixing IDs from different entity types.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error parsing a [`DocumentId`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid identifier: {0:?}")]
pub struct IdParseError(pub String);

/// An entity identifier within a collection.
///
/// Collections assign IDs with one of two strategies, and both forms must
/// round-trip through JSON snapshots and URL path segments:
///
/// - `Serial` - monotonically assigned integer (`1`, `2`, ...)
/// - `Opaque` - random UUID with no ordering semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    /// Sequential integer identifier.
    Serial(u64),
    /// Opaque random identifier.
    Opaque(Uuid),
}

impl DocumentId {
    /// Returns the serial value if this is a sequential identifier.
    #[must_use]
    pub const fn as_serial(&self) -> Option<u64> {
        match self {
            Self::Serial(n) => Some(*n),
            Self::Opaque(_) => None,
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(n) => write!(f, "{n}"),
            Self::Opaque(u) => write!(f, "{u}"),
        }
    }
}

impl std::str::FromStr for DocumentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<u64>() {
            return Ok(Self::Serial(n));
        }
        s.parse::<Uuid>()
            .map(Self::Opaque)
            .map_err(|_| IdParseError(s.to_owned()))
    }
}

impl From<u64> for DocumentId {
    fn from(n: u64) -> Self {
        Self::Serial(n)
    }
}

impl From<Uuid> for DocumentId {
    fn from(u: Uuid) -> Self {
        Self::Opaque(u)
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around [`DocumentId`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `Display` and `FromStr` delegating to [`DocumentId`]
/// - `From<DocumentId>` and `Into<DocumentId>` implementations
///
/// # Example
///
/// ```rust
/// # use tiendita_core::define_id;
/// define_id!(ProductId);
/// define_id!(CartId);
///
/// let product_id = ProductId::serial(1);
///
/// // These are different types, so this won't compile:
/// // let _: CartId = product_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::DocumentId);

        impl $name {
            /// Create a new ID from a document identifier.
            #[must_use]
            pub const fn new(id: $crate::DocumentId) -> Self {
                Self(id)
            }

            /// Create a sequential ID.
            #[must_use]
            pub const fn serial(n: u64) -> Self {
                Self($crate::DocumentId::Serial(n))
            }

            /// Create an opaque ID.
            #[must_use]
            pub const fn opaque(u: ::uuid::Uuid) -> Self {
                Self($crate::DocumentId::Opaque(u))
            }

            /// Get the underlying document identifier.
            #[must_use]
            pub const fn as_document_id(&self) -> $crate::DocumentId {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::IdParseError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse::<$crate::DocumentId>().map(Self)
            }
        }

        impl From<$crate::DocumentId> for $name {
            fn from(id: $crate::DocumentId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::DocumentId {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(CartId);
define_id!(UserId);
