//! Cart domain types.

use serde::{Deserialize, Serialize};

use tiendita_core::{CartId, DocumentId, ProductId};

use crate::store::Document;

/// One line in a cart: a weak reference to a product plus a quantity.
///
/// The reference does not cascade - deleting the product leaves the line
/// dangling. Within one cart each product appears at most once; re-adding
/// increments `quantity` instead of duplicating the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Referenced product identifier.
    pub product: ProductId,
    pub quantity: u32,
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Unique opaque identifier.
    pub id: CartId,
    /// Ordered cart lines.
    pub products: Vec<CartLine>,
}

impl Document for Cart {
    const COLLECTION: &'static str = "carts";

    fn id(&self) -> DocumentId {
        self.id.as_document_id()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_snapshot_layout() {
        let uuid = Uuid::new_v4();
        let cart = Cart {
            id: CartId::opaque(uuid),
            products: vec![CartLine {
                product: ProductId::serial(3),
                quantity: 2,
            }],
        };

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": uuid.to_string(),
                "products": [{"product": 3, "quantity": 2}],
            })
        );
    }
}
