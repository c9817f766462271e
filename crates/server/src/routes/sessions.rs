//! Session and registration handlers.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppJson, Result};
use crate::middleware::{CurrentUser, SESSION_COOKIE};
use crate::models::{NewUser, PublicUser, UserPatch};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /sessions/register`
///
/// Creates an empty cart first, then the user linked to it. There is no
/// cross-collection transaction: if user creation fails the cart stays
/// behind, unreferenced.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewUser>,
) -> Result<(StatusCode, Json<PublicUser>)> {
    let cart = state.carts().create().await?;
    let user = state.users().create(input).await?;
    let user = state
        .users()
        .update(
            user.id,
            UserPatch {
                cart: Some(cart.id),
                ..UserPatch::default()
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /sessions/login`
///
/// On success returns the token in the body and also sets it as an http-only
/// cookie, so both header and cookie clients work.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<Value>)> {
    let (user, token) = state.auth().login(&input.email, &input.password).await?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(json!({ "token": token, "user": user })),
    ))
}

/// `GET /sessions/current`
pub async fn current(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user)
}

/// `POST /sessions/logout`
///
/// Purely cookie-based: issued tokens stay valid until they expire, there is
/// no server-side revocation list.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    // Adding an already-expired cookie sends the clearing header whether or
    // not the request carried the cookie in the first place.
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();
    (jar.add(removal), Json(json!({ "message": "logged out" })))
}
