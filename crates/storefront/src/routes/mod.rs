//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog (public)
//! GET  /api/products               - Product listing (?gender=men|women)
//! GET  /api/products/bestsellers   - Bestseller listing
//! GET  /api/products/{slug}        - Product detail
//!
//! # Cart (requires auth)
//! GET  /api/cart                   - Current cart
//! POST /api/cart/add               - Add one unit of a product
//! POST /api/cart/update            - Overwrite a line quantity
//! POST /api/cart/remove            - Remove a line
//! POST /api/cart/clear             - Empty the cart
//!
//! # Checkout (requires auth)
//! POST /api/checkout               - Place an order from the cart
//!
//! # Order history
//! GET  /api/profile/orders         - Ledger orders for the signed-in user
//! GET  /api/orders?email=          - Mirror orders for an email (public facade)
//!
//! # Auth
//! POST /api/auth/register          - Create an account and sign in
//! POST /api/auth/login             - Sign in
//! POST /api/auth/logout            - Sign out
//! GET  /api/auth/me                - Current user, if any
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/bestsellers", get(products::bestsellers))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::place_order))
        .route("/api/profile/orders", get(profile::orders))
        .route("/api/orders", get(orders::by_email))
        .nest("/api/auth", auth_routes())
}
