//! Authentication extractors.
//!
//! Provides extractors for requiring an authenticated user (or an admin) in
//! route handlers. The session token is read from the `Authorization: Bearer`
//! header first, then from the session cookie; a token in the header wins
//! when both are present.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::models::PublicUser;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct CurrentUser(pub PublicUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing credentials".to_string()))?;

        let record = state.auth().authenticate(&token).await?;
        Ok(Self(PublicUser::from(&record)))
    }
}

/// Extractor that requires an authenticated admin.
pub struct RequireAdmin(pub PublicUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError::Forbidden("admin role required".to_string()));
        }
        Ok(Self(user))
    }
}

/// Pull the session token out of the request, header before cookie.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(token) = bearer_token(parts) {
        return Some(token);
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let parts = parts_with_headers(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "token=cookie-token"),
        ]);
        assert_eq!(extract_token(&parts).unwrap(), "header-token");
    }

    #[test]
    fn test_cookie_is_used_without_header() {
        let parts = parts_with_headers(&[("cookie", "other=x; token=cookie-token")]);
        assert_eq!(extract_token(&parts).unwrap(), "cookie-token");
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let parts = parts_with_headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert!(extract_token(&parts).is_none());
    }

    #[test]
    fn test_no_credentials_yields_none() {
        let parts = parts_with_headers(&[]);
        assert!(extract_token(&parts).is_none());
    }
}
