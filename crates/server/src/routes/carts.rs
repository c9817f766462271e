//! Cart handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use tiendita_core::{CartId, ProductId};

use crate::error::Result;
use crate::models::Cart;
use crate::state::AppState;

use super::parse_id;

/// `POST /carts`
pub async fn create(State(state): State<AppState>) -> Result<(StatusCode, Json<Cart>)> {
    let cart = state.carts().create().await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// `GET /carts/{id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Cart>> {
    let id: CartId = parse_id(&id, "cart")?;
    let cart = state.carts().get(id).await?;
    Ok(Json(cart))
}

/// `POST /carts/{id}/product/{pid}`
pub async fn add_product(
    State(state): State<AppState>,
    Path((id, pid)): Path<(String, String)>,
) -> Result<Json<Cart>> {
    let cart_id: CartId = parse_id(&id, "cart")?;
    let product_id: ProductId = parse_id(&pid, "product")?;
    let cart = state.carts().add_product(cart_id, product_id).await?;
    Ok(Json(cart))
}
