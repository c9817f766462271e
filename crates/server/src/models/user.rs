//! User domain types.
//!
//! The stored record and its public projection are separate types from the
//! start: [`UserRecord`] carries the password hash and never leaves the
//! store/auth layer, [`PublicUser`] is what every API response exposes.

use serde::{Deserialize, Serialize};

use tiendita_core::{CartId, DocumentId, Email, Role, UserId};

use crate::store::Document;

/// Internal user record, including the password hash.
///
/// Only the one-way hash is ever persisted; the plaintext password exists
/// solely inside registration/login inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique opaque identifier.
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Unique across the collection, compared case-sensitively.
    pub email: Email,
    pub age: u32,
    /// Argon2id password hash.
    pub password: String,
    /// Weak reference to the user's cart, if one is linked.
    pub cart: Option<CartId>,
    #[serde(default)]
    pub role: Role,
}

impl Document for UserRecord {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> DocumentId {
        self.id.as_document_id()
    }
}

/// Public projection of a user - everything except the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub age: u32,
    pub cart: Option<CartId>,
    pub role: Role,
}

impl From<&UserRecord> for PublicUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            age: record.age,
            cart: record.cart,
            role: record.role,
        }
    }
}

/// Registration input. The email is kept as a raw string here and validated
/// by the manager so a bad address maps to a `ValidationError`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Partial update for a user. No `id` field - identifiers are immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    /// Re-hashed by the manager when present.
    pub password: Option<String>,
    pub cart: Option<CartId>,
    pub role: Option<Role>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_public_projection_has_no_password() {
        let record = UserRecord {
            id: UserId::opaque(Uuid::new_v4()),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: Email::parse("ada@example.com").unwrap(),
            age: 36,
            password: "$argon2id$...".to_owned(),
            cart: None,
            role: Role::User,
        };

        let public = PublicUser::from(&record);
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_record_defaults_role_to_user() {
        let record: UserRecord = serde_json::from_str(
            r#"{
                "id": "8e1c9f52-4a7b-4f44-9d8a-0b1e2c3d4e5f",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "age": 36,
                "password": "hash",
                "cart": null
            }"#,
        )
        .unwrap();
        assert_eq!(record.role, Role::User);
    }
}
