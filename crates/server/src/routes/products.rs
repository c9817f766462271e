//! Product catalog handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use tiendita_core::ProductId;

use crate::error::{AppJson, AppQuery, Result};
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

use super::parse_id;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Truncate the listing to the first `limit` products.
    pub limit: Option<usize>,
}

/// `GET /products`
pub async fn index(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.products().list(query.limit).await?;
    Ok(Json(products))
}

/// `GET /products/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id: ProductId = parse_id(&id, "product")?;
    let product = state.products().get(id).await?;
    Ok(Json(product))
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.products().add(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<ProductPatch>,
) -> Result<Json<Product>> {
    let id: ProductId = parse_id(&id, "product")?;
    let product = state.products().update(id, patch).await?;
    Ok(Json(product))
}

/// `DELETE /products/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id: ProductId = parse_id(&id, "product")?;
    state.products().delete(id).await?;
    Ok(Json(json!({ "message": format!("product {id} deleted") })))
}
