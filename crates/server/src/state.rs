//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{IdStrategyKind, ServerConfig};
use crate::managers::{CartManager, ProductManager, UserManager};
use crate::realtime::ProductFeed;
use crate::services::auth::AuthService;
use crate::store::{Collection, IdStrategy};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// domain managers, the auth service, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    products: ProductManager,
    carts: CartManager,
    users: UserManager,
    auth: AuthService,
    feed: ProductFeed,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Collections are opened under `config.data_dir`; the snapshot files are
    /// created lazily on first access.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let product_ids = match config.id_strategy {
            IdStrategyKind::Sequential => IdStrategy::sequential(),
            IdStrategyKind::Random => IdStrategy::random(),
        };

        let feed = ProductFeed::new();
        let products = ProductManager::new(
            Arc::new(Collection::new(&config.data_dir, product_ids)),
            feed.clone(),
        );
        let carts = CartManager::new(
            Arc::new(Collection::new(&config.data_dir, IdStrategy::random())),
            products.clone(),
        );
        let users = UserManager::new(Arc::new(Collection::new(
            &config.data_dir,
            IdStrategy::random(),
        )));
        let auth = AuthService::new(users.clone(), &config.jwt_secret, config.token_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                carts,
                users,
                auth,
                feed,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the product manager.
    #[must_use]
    pub fn products(&self) -> &ProductManager {
        &self.inner.products
    }

    /// Get a reference to the cart manager.
    #[must_use]
    pub fn carts(&self) -> &CartManager {
        &self.inner.carts
    }

    /// Get a reference to the user manager.
    #[must_use]
    pub fn users(&self) -> &UserManager {
        &self.inner.users
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the product update feed.
    #[must_use]
    pub fn feed(&self) -> &ProductFeed {
        &self.inner.feed
    }
}
