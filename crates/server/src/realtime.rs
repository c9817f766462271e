//! Change broadcaster for live product viewers.
//!
//! After any successful product mutation the full current product list is
//! published to every connected viewer. Delivery is best-effort and
//! non-blocking: the mutator never waits for viewers, a viewer that lags
//! behind skips to the newest snapshot, and viewers that connect between two
//! broadcasts receive nothing until the next mutation (no history replay).

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::models::Product;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 64;

/// Handle for publishing and subscribing to product-list updates.
///
/// Cheaply cloneable; all clones share one `tokio::sync::broadcast` channel,
/// which is safe for concurrent publish and subscribe without an external
/// lock around the subscriber set.
#[derive(Debug, Clone)]
pub struct ProductFeed {
    sender: broadcast::Sender<Arc<Vec<Product>>>,
}

impl ProductFeed {
    /// Create a feed with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a feed with an explicit channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish the full product list to all connected viewers.
    ///
    /// Returns the number of viewers that received the update. Zero viewers
    /// is not an error.
    pub fn publish(&self, products: Vec<Product>) -> usize {
        let count = self.sender.send(Arc::new(products)).unwrap_or(0);
        tracing::debug!(viewers = count, "published product list");
        count
    }

    /// Subscribe a new viewer.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Vec<Product>>> {
        self.sender.subscribe()
    }

    /// Number of currently connected viewers.
    #[must_use]
    pub fn viewer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ProductFeed {
    fn default() -> Self {
        Self::new()
    }
}
