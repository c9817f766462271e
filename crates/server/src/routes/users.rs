//! User management handlers, all gated behind the admin role.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use tiendita_core::UserId;

use crate::error::{AppJson, Result};
use crate::middleware::RequireAdmin;
use crate::models::{PublicUser, UserPatch};
use crate::state::AppState;

use super::parse_id;

/// `GET /users`
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>> {
    let users = state.users().list().await?;
    Ok(Json(users))
}

/// `GET /users/{id}`
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>> {
    let id: UserId = parse_id(&id, "user")?;
    let user = state.users().get(id).await?;
    Ok(Json(user))
}

/// `PUT /users/{id}`
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UserPatch>,
) -> Result<Json<PublicUser>> {
    let id: UserId = parse_id(&id, "user")?;
    let user = state.users().update(id, patch).await?;
    Ok(Json(user))
}

/// `DELETE /users/{id}`
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id: UserId = parse_id(&id, "user")?;
    state.users().delete(id).await?;
    Ok(Json(json!({ "message": format!("user {id} deleted") })))
}
