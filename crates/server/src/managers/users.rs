//! User manager.

use std::sync::Arc;

use tiendita_core::{Email, UserId};

use super::DomainError;
use crate::models::{NewUser, PublicUser, UserPatch, UserRecord};
use crate::services::auth::hash_password;
use crate::store::Collection;

/// Collection-specific rules for user accounts.
///
/// All read paths that face the API return [`PublicUser`]; the raw
/// [`UserRecord`] with its password hash is only handed to the auth service.
#[derive(Clone)]
pub struct UserManager {
    users: Arc<Collection<UserRecord>>,
}

impl UserManager {
    /// Create a manager over the users collection.
    #[must_use]
    pub fn new(users: Arc<Collection<UserRecord>>) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// The email must parse and be unique across the collection; the
    /// password is hashed before anything is persisted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` on a malformed email, empty names or
    /// password, or a duplicate email.
    pub async fn create(&self, input: NewUser) -> Result<PublicUser, DomainError> {
        if input.first_name.is_empty() || input.last_name.is_empty() {
            return Err(DomainError::validation("first and last name are required"));
        }
        if input.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        let email =
            Email::parse(&input.email).map_err(|e| DomainError::validation(e.to_string()))?;
        let hash = hash_password(&input.password).map_err(|_| DomainError::Hash)?;

        self.users
            .mutate(|docs| {
                if docs.iter().any(|u| u.email == email) {
                    return Err(DomainError::validation(format!(
                        "a user with email '{email}' already exists"
                    )));
                }

                let record = UserRecord {
                    id: UserId::from(self.users.next_id(docs)),
                    first_name: input.first_name.clone(),
                    last_name: input.last_name.clone(),
                    email: email.clone(),
                    age: input.age,
                    password: hash.clone(),
                    cart: None,
                    role: input.role,
                };
                let public = PublicUser::from(&record);
                docs.push(record);
                Ok(public)
            })
            .await
    }

    /// List all users as public projections.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Store` on snapshot failure.
    pub async fn list(&self) -> Result<Vec<PublicUser>, DomainError> {
        Ok(self
            .users
            .load()
            .await?
            .iter()
            .map(PublicUser::from)
            .collect())
    }

    /// Fetch one user by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the id is absent.
    pub async fn get(&self, id: UserId) -> Result<PublicUser, DomainError> {
        self.find_by_id(id)
            .await?
            .as_ref()
            .map(PublicUser::from)
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Look up the raw record by id. `None` when absent; used by the auth
    /// layer, which must not leak existence through error shapes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Store` on snapshot failure.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.users.load().await?.into_iter().find(|u| u.id == id))
    }

    /// Look up the raw record by email. `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Store` on snapshot failure.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, DomainError> {
        Ok(self
            .users
            .load()
            .await?
            .into_iter()
            .find(|u| &u.email == email))
    }

    /// Patch a user in place. The identifier is immutable; a new password is
    /// re-hashed, a new email is re-validated and checked for uniqueness
    /// against the other users.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the id is absent, or
    /// `DomainError::Validation` on a malformed or colliding email.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<PublicUser, DomainError> {
        let email = patch
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let hash = patch
            .password
            .as_deref()
            .map(hash_password)
            .transpose()
            .map_err(|_| DomainError::Hash)?;

        self.users
            .mutate(|docs| {
                if let Some(email) = &email {
                    if docs.iter().any(|u| u.id != id && &u.email == email) {
                        return Err(DomainError::validation(format!(
                            "a user with email '{email}' already exists"
                        )));
                    }
                }

                let user = docs
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| DomainError::not_found("user", id))?;

                if let Some(first_name) = patch.first_name.clone() {
                    user.first_name = first_name;
                }
                if let Some(last_name) = patch.last_name.clone() {
                    user.last_name = last_name;
                }
                if let Some(email) = email.clone() {
                    user.email = email;
                }
                if let Some(age) = patch.age {
                    user.age = age;
                }
                if let Some(hash) = hash.clone() {
                    user.password = hash;
                }
                if let Some(cart) = patch.cart {
                    user.cart = Some(cart);
                }
                if let Some(role) = patch.role {
                    user.role = role;
                }
                Ok(PublicUser::from(&*user))
            })
            .await
    }

    /// Remove a user.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no row was removed.
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        self.users
            .mutate(|docs| {
                let before = docs.len();
                docs.retain(|u| u.id != id);
                if docs.len() == before {
                    return Err(DomainError::not_found("user", id));
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::tempdir;

    use tiendita_core::Role;

    use crate::services::auth::verify_password;
    use crate::store::IdStrategy;

    use super::*;

    fn manager(dir: &std::path::Path) -> UserManager {
        UserManager::new(Arc::new(Collection::new(dir, IdStrategy::random())))
    }

    fn sample_input() -> NewUser {
        serde_json::from_str(
            r#"{
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "age": 36,
                "password": "correct horse"
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_hashes_password_and_defaults_role() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        let public = manager.create(sample_input()).await.unwrap();
        assert_eq!(public.role, Role::User);
        assert!(public.cart.is_none());

        let record = manager.find_by_id(public.id).await.unwrap().unwrap();
        assert_ne!(record.password, "correct horse");
        assert!(verify_password("correct horse", &record.password));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        manager.create(sample_input()).await.unwrap();
        let err = manager.create(sample_input()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(manager.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_email_is_a_validation_error() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        let input = NewUser {
            email: "not-an-email".to_owned(),
            ..sample_input()
        };
        let err = manager.create(input).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        let public = manager.create(sample_input()).await.unwrap();

        let patch: UserPatch = serde_json::from_str(r#"{"password":"new secret"}"#).unwrap();
        manager.update(public.id, patch).await.unwrap();

        let record = manager.find_by_id(public.id).await.unwrap().unwrap();
        assert!(verify_password("new secret", &record.password));
        assert!(!verify_password("correct horse", &record.password));
    }

    #[tokio::test]
    async fn test_update_rejects_email_taken_by_another_user() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        manager.create(sample_input()).await.unwrap();
        let other = manager
            .create(NewUser {
                email: "grace@example.com".to_owned(),
                ..sample_input()
            })
            .await
            .unwrap();

        let patch: UserPatch =
            serde_json::from_str(r#"{"email":"ada@example.com"}"#).unwrap();
        let err = manager.update(other.id, patch).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        let public = manager.create(sample_input()).await.unwrap();

        manager.delete(public.id).await.unwrap();
        let err = manager.get(public.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(manager.find_by_id(public.id).await.unwrap().is_none());
    }
}
