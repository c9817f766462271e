//! Product domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tiendita_core::{DocumentId, ProductId};

use crate::store::Document;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, assigned by the store.
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Merchant code, unique across the live collection.
    pub code: String,
    /// Non-negative price; zero is legitimate.
    pub price: Decimal,
    /// Whether the product is visible/active.
    pub status: bool,
    /// Units in stock; zero is legitimate.
    pub stock: u32,
    pub category: String,
    /// Ordered image URLs, possibly empty.
    pub thumbnails: Vec<String>,
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> DocumentId {
        self.id.as_document_id()
    }
}

/// Input for creating a product.
///
/// All six required fields must be present in the request body; `price: 0`
/// and `stock: 0` are accepted (presence is definedness, not truthiness).
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: Decimal,
    #[serde(default = "default_status")]
    pub status: bool,
    pub stock: u32,
    pub category: String,
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

const fn default_status() -> bool {
    true
}

/// Partial update for a product.
///
/// There is deliberately no `id` field: an `id` key in the patch body is
/// ignored, keeping the identifier immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<bool>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
}

impl ProductPatch {
    /// Apply the present fields onto an existing product.
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(code) = self.code {
            product.code = code;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(thumbnails) = self.thumbnails {
            product.thumbnails = thumbnails;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_accepts_zero_price_and_stock() {
        let input: NewProduct = serde_json::from_str(
            r#"{"title":"A","description":"d","code":"X1","price":0,"stock":0,"category":"c"}"#,
        )
        .unwrap();
        assert_eq!(input.price, Decimal::ZERO);
        assert_eq!(input.stock, 0);
        assert!(input.status);
        assert!(input.thumbnails.is_empty());
    }

    #[test]
    fn test_new_product_missing_field_is_rejected() {
        // No `code` field.
        let result: Result<NewProduct, _> = serde_json::from_str(
            r#"{"title":"A","description":"d","price":10,"stock":5,"category":"c"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_ignores_id_key() {
        let patch: ProductPatch =
            serde_json::from_str(r#"{"id":999,"title":"renamed"}"#).unwrap();

        let mut product = Product {
            id: ProductId::serial(1),
            title: "A".to_owned(),
            description: "d".to_owned(),
            code: "X1".to_owned(),
            price: Decimal::from(10),
            status: true,
            stock: 5,
            category: "c".to_owned(),
            thumbnails: Vec::new(),
        };
        patch.apply(&mut product);

        assert_eq!(product.id, ProductId::serial(1));
        assert_eq!(product.title, "renamed");
    }
}
