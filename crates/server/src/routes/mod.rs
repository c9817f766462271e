//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Products
//! GET    /products                  - Product listing (optional ?limit=N)
//! POST   /products                  - Create product (201)
//! GET    /products/{id}             - Product detail
//! PUT    /products/{id}             - Patch product
//! DELETE /products/{id}             - Remove product
//!
//! # Carts
//! POST /carts                       - Create empty cart (201)
//! GET  /carts/{id}                  - Cart detail
//! POST /carts/{id}/product/{pid}    - Add product / bump quantity
//!
//! # Sessions
//! POST /sessions/register           - Register (201, creates linked cart)
//! POST /sessions/login              - Login, sets session cookie
//! GET  /sessions/current            - Authenticated user
//! POST /sessions/logout             - Clear session cookie
//!
//! # Users (admin only)
//! GET    /users                     - User listing
//! GET    /users/{id}                - User detail
//! PUT    /users/{id}                - Update user
//! DELETE /users/{id}                - Remove user
//!
//! # Live updates
//! GET /live/products                - WebSocket, full product list per change
//! ```

pub mod carts;
pub mod live;
pub mod products;
pub mod sessions;
pub mod users;

use std::str::FromStr;

use axum::{
    Router,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(carts::create))
        .route("/{id}", get(carts::show))
        .route("/{id}/product/{pid}", post(carts::add_product))
}

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(sessions::register))
        .route("/login", post(sessions::login))
        .route("/current", get(sessions::current))
        .route("/logout", post(sessions::logout))
}

/// Create the user management routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(users::index)).route(
        "/{id}",
        get(users::show).put(users::update).delete(users::destroy),
    )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/carts", cart_routes())
        .nest("/sessions", session_routes())
        .nest("/users", user_routes())
        .route("/live/products", get(live::products_feed))
}

/// Parse a path segment into a typed id.
///
/// An unparseable id cannot name any stored document, so it maps straight to
/// a not-found error rather than a bad request.
fn parse_id<T: FromStr>(raw: &str, what: &'static str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{what} {raw} not found")))
}
