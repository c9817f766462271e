//! Authentication service.
//!
//! Issues and verifies the signed session tokens (HS256 JWTs) that back both
//! the `Authorization` header and the session cookie. Login failures are
//! uniform: unknown email and wrong password produce the same error.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use tiendita_core::{Email, Role, UserId};

use crate::managers::UserManager;
use crate::models::{PublicUser, UserRecord};

/// Claims carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id, as its canonical string form.
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Authentication service.
///
/// Holds the signing keys and the user manager; the store stays the single
/// source of truth, so every token verification re-checks that the subject
/// still exists.
#[derive(Clone)]
pub struct AuthService {
    users: UserManager,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: chrono::Duration,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(users: UserManager, secret: &SecretString, token_ttl: chrono::Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            users,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl,
        }
    }

    /// Login with email and password, returning the public user and a fresh
    /// session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for every caller-facing
    /// failure: malformed email, unknown email, or wrong password.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(PublicUser, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok((PublicUser::from(&user), token))
    }

    /// Sign a session token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncode` if signing fails.
    pub fn issue_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenEncode)
    }

    /// Verify a session token and resolve it to the current user record.
    ///
    /// The subject is looked up fresh on every call: a token whose user was
    /// deleted after issuance is rejected.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for a bad signature, an expired
    /// token, an unparseable subject, or a vanished user.
    pub async fn authenticate(&self, token: &str) -> Result<UserRecord, AuthError> {
        let claims =
            decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
                .map_err(|_| AuthError::InvalidToken)?
                .claims;

        let id: UserId = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        self.users
            .find_by_id(id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash. An unparseable hash counts as a
/// mismatch.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;

    use crate::models::NewUser;
    use crate::store::{Collection, IdStrategy};

    use super::*;

    fn service(dir: &std::path::Path) -> (AuthService, UserManager) {
        let users = UserManager::new(Arc::new(Collection::new(dir, IdStrategy::random())));
        let secret = SecretString::from("a".repeat(32));
        let auth = AuthService::new(users.clone(), &secret, chrono::Duration::hours(24));
        (auth, users)
    }

    async fn register(users: &UserManager) -> PublicUser {
        let input: NewUser = serde_json::from_str(
            r#"{
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "age": 36,
                "password": "correct horse"
            }"#,
        )
        .unwrap();
        users.create(input).await.unwrap()
    }

    #[tokio::test]
    async fn test_login_then_authenticate_roundtrips() {
        let dir = tempdir().unwrap();
        let (auth, users) = service(dir.path());
        let registered = register(&users).await;

        let (user, token) = auth.login("ada@example.com", "correct horse").await.unwrap();
        assert_eq!(user.id, registered.id);

        let record = auth.authenticate(&token).await.unwrap();
        assert_eq!(record.id, registered.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let dir = tempdir().unwrap();
        let (auth, users) = service(dir.path());
        register(&users).await;

        let unknown = auth
            .login("nobody@example.com", "correct horse")
            .await
            .unwrap_err();
        let wrong = auth
            .login("ada@example.com", "wrong password")
            .await
            .unwrap_err();
        let malformed = auth.login("not-an-email", "whatever").await.unwrap_err();

        for err in [unknown, wrong, malformed] {
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(err.to_string(), "invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let dir = tempdir().unwrap();
        let (auth, _) = service(dir.path());

        let err = auth.authenticate("not.a.jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_rejected() {
        let dir = tempdir().unwrap();
        let (auth, users) = service(dir.path());
        let registered = register(&users).await;

        let (_, token) = auth.login("ada@example.com", "correct horse").await.unwrap();
        users.delete(registered.id).await.unwrap();

        let err = auth.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let dir = tempdir().unwrap();
        let (auth, users) = service(dir.path());
        let registered = register(&users).await;
        let record = users.find_by_id(registered.id).await.unwrap().unwrap();

        let other_secret = SecretString::from("b".repeat(32));
        let other = AuthService::new(
            users.clone(),
            &other_secret,
            chrono::Duration::hours(24),
        );
        let forged = other.issue_token(&record).unwrap();

        let err = auth.authenticate(&forged).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let dir = tempdir().unwrap();
        let (_, users) = service(dir.path());
        let registered = register(&users).await;
        let record = users.find_by_id(registered.id).await.unwrap().unwrap();

        // Same secret, but the token expired well past the decode leeway.
        let secret = SecretString::from("a".repeat(32));
        let expired_issuer =
            AuthService::new(users.clone(), &secret, chrono::Duration::hours(-2));
        let token = expired_issuer.issue_token(&record).unwrap();

        let auth = AuthService::new(users, &secret, chrono::Duration::hours(24));
        let err = auth.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_password_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not a phc string"));
    }
}
