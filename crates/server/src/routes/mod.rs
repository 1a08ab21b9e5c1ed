//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Auth
//! POST /auth/register          - Create an account
//! POST /auth/login             - Log in, establishes a session
//! POST /auth/logout            - Log out
//! GET  /auth/profile           - Current user's profile
//! PUT  /auth/profile           - Edit profile fields
//!
//! # Inventory
//! GET  /inventory              - Search (name?, category?, min_price?, max_price?)
//! POST /inventory              - Add an item (management)
//! PUT  /inventory/quantity     - Overwrite an item's quantity (management)
//! DELETE /inventory            - Remove an item (management)
//!
//! # Cart (requires a client session)
//! GET  /cart                   - Cart contents and total
//! POST /cart/add               - Add an item by name
//! DELETE /cart/remove          - Remove entries by name
//! GET  /cart/total             - Total, optionally with ?discount_pct=
//! POST /cart/checkout          - Run checkout
//!
//! # Orders (requires auth)
//! GET  /orders                 - Own history (clients) or all orders (management)
//! GET  /orders/{id}            - One order, ownership-scoped
//! PUT  /orders/{id}/status     - Status transition (management)
//! PUT  /orders/{id}/cancel     - Cancel an order
//! ```

pub mod auth;
pub mod cart;
pub mod inventory;
pub mod orders;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile).put(auth::edit_profile))
}

/// Create the inventory routes router.
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inventory::search)
                .post(inventory::create_item)
                .delete(inventory::remove_item),
        )
        .route("/quantity", put(inventory::update_quantity))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add_item))
        .route("/remove", delete(cart::remove_item))
        .route("/total", get(cart::total))
        .route("/checkout", post(cart::checkout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::history))
        .route("/{id}", get(orders::get))
        .route("/{id}/status", put(orders::update_status))
        .route("/{id}/cancel", put(orders::cancel))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/inventory", inventory_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
}
