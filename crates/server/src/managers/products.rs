//! Product manager.

use std::sync::Arc;

use tiendita_core::ProductId;

use super::DomainError;
use crate::models::{NewProduct, Product, ProductPatch};
use crate::realtime::ProductFeed;
use crate::store::Collection;

/// Collection-specific rules for the product catalog.
///
/// Every successful mutation publishes the full current product list on the
/// injected [`ProductFeed`].
#[derive(Clone)]
pub struct ProductManager {
    products: Arc<Collection<Product>>,
    feed: ProductFeed,
}

impl ProductManager {
    /// Create a manager over the products collection.
    #[must_use]
    pub fn new(products: Arc<Collection<Product>>, feed: ProductFeed) -> Self {
        Self { products, feed }
    }

    /// List products, optionally truncated to `limit`. A non-positive limit
    /// is ignored and the full list is returned.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Store` on snapshot failure.
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<Product>, DomainError> {
        let mut products = self.products.load().await?;
        if let Some(limit) = limit.filter(|&limit| limit > 0) {
            products.truncate(limit);
        }
        Ok(products)
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the id is absent.
    pub async fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        self.products
            .load()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    /// Create a product.
    ///
    /// The identifier is assigned by the store; `code` must be non-empty and
    /// unique across the live collection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` on an empty or colliding code, or on
    /// a negative price. On failure the collection is left unchanged.
    pub async fn add(&self, input: NewProduct) -> Result<Product, DomainError> {
        if input.code.is_empty() {
            return Err(DomainError::validation("product code cannot be empty"));
        }
        if input.price.is_sign_negative() {
            return Err(DomainError::validation("price cannot be negative"));
        }

        self.products
            .mutate_then(
                |docs| {
                    if docs.iter().any(|p| p.code == input.code) {
                        return Err(DomainError::validation(format!(
                            "a product with code '{}' already exists",
                            input.code
                        )));
                    }

                    let product = Product {
                        id: ProductId::from(self.products.next_id(docs)),
                        title: input.title.clone(),
                        description: input.description.clone(),
                        code: input.code.clone(),
                        price: input.price,
                        status: input.status,
                        stock: input.stock,
                        category: input.category.clone(),
                        thumbnails: input.thumbnails.clone(),
                    };
                    docs.push(product.clone());
                    Ok(product)
                },
                // Published under the collection lock: viewers see mutations
                // in commit order.
                |docs| {
                    self.feed.publish(docs.to_vec());
                },
            )
            .await
    }

    /// Patch a product in place. The identifier is immutable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the id is absent, or
    /// `DomainError::Validation` if the patch would produce a negative price
    /// or a code collision with another product.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, DomainError> {
        if patch.price.is_some_and(|price| price.is_sign_negative()) {
            return Err(DomainError::validation("price cannot be negative"));
        }

        self.products
            .mutate_then(
                |docs| {
                    if let Some(code) = &patch.code {
                        if code.is_empty() {
                            return Err(DomainError::validation("product code cannot be empty"));
                        }
                        if docs.iter().any(|p| p.id != id && &p.code == code) {
                            return Err(DomainError::validation(format!(
                                "a product with code '{code}' already exists"
                            )));
                        }
                    }

                    let product = docs
                        .iter_mut()
                        .find(|p| p.id == id)
                        .ok_or_else(|| DomainError::not_found("product", id))?;
                    patch.apply(product);
                    Ok(product.clone())
                },
                |docs| {
                    self.feed.publish(docs.to_vec());
                },
            )
            .await
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no row was removed.
    pub async fn delete(&self, id: ProductId) -> Result<(), DomainError> {
        self.products
            .mutate_then(
                |docs| {
                    let before = docs.len();
                    docs.retain(|p| p.id != id);
                    if docs.len() == before {
                        return Err(DomainError::not_found("product", id));
                    }
                    Ok(())
                },
                |docs| {
                    self.feed.publish(docs.to_vec());
                },
            )
            .await
    }
}
