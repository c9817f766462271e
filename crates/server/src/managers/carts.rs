//! Cart manager.

use std::sync::Arc;

use tiendita_core::{CartId, ProductId};

use super::{DomainError, ProductManager};
use crate::models::{Cart, CartLine};
use crate::store::Collection;

/// Collection-specific rules for carts.
#[derive(Clone)]
pub struct CartManager {
    carts: Arc<Collection<Cart>>,
    products: ProductManager,
}

impl CartManager {
    /// Create a manager over the carts collection.
    ///
    /// The product manager is used to confirm product existence before a
    /// line is added.
    #[must_use]
    pub fn new(carts: Arc<Collection<Cart>>, products: ProductManager) -> Self {
        Self { carts, products }
    }

    /// Create a new empty cart.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Store` on snapshot failure.
    pub async fn create(&self) -> Result<Cart, DomainError> {
        self.carts
            .mutate(|docs| {
                let cart = Cart {
                    id: CartId::from(self.carts.next_id(docs)),
                    products: Vec::new(),
                };
                docs.push(cart.clone());
                Ok::<_, DomainError>(cart)
            })
            .await
    }

    /// Fetch one cart by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the id is absent.
    pub async fn get(&self, id: CartId) -> Result<Cart, DomainError> {
        self.carts
            .load()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found("cart", id))
    }

    /// Add a product to a cart, incrementing the quantity if a line for it
    /// already exists. A product appears at most once per cart.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the product or the cart is absent.
    pub async fn add_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Cart, DomainError> {
        // Confirm the product exists before touching the cart snapshot.
        self.products.get(product_id).await?;

        self.carts
            .mutate(|docs| {
                let cart = docs
                    .iter_mut()
                    .find(|c| c.id == cart_id)
                    .ok_or_else(|| DomainError::not_found("cart", cart_id))?;

                if let Some(line) = cart.products.iter_mut().find(|l| l.product == product_id) {
                    line.quantity += 1;
                } else {
                    cart.products.push(CartLine {
                        product: product_id,
                        quantity: 1,
                    });
                }
                Ok(cart.clone())
            })
            .await
    }
}
