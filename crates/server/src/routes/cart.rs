//! Cart route handlers.
//!
//! Cart contents, add/remove, discount preview and checkout. Cart routes
//! are client-only; management accounts have no cart.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::cart::Cart;
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub quantity: u32,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub name: String,
}

/// Discount preview query.
#[derive(Debug, Deserialize)]
pub struct DiscountQuery {
    pub discount_pct: Option<Decimal>,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub payment_info: String,
}

/// Cart contents response.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Cart,
    pub total: Decimal,
}

// =============================================================================
// Handlers
// =============================================================================

/// The logged-in client's cart and its total.
#[tracing::instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let users = state.users().lock().await;
    let cart = users
        .cart(user.id)
        .ok_or_else(|| AppError::Forbidden("only clients have a cart".to_string()))?;
    Ok(Json(CartResponse {
        cart: cart.clone(),
        total: cart.calculate_total(),
    }))
}

/// Add an inventory item to the cart by name.
///
/// The requested quantity is checked against current stock; an add that
/// would overdraw is rejected up front rather than at checkout.
#[tracing::instrument(skip_all)]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>> {
    // Lock order: users before inventory.
    let mut users = state.users().lock().await;
    let inventory = state.inventory().lock().await;

    let item = inventory
        .find_by_name(&request.name)
        .ok_or_else(|| AppError::NotFound(format!("item {}", request.name)))?;
    if item.quantity < request.quantity {
        return Err(AppError::BadRequest(format!(
            "insufficient stock for {}: requested {}, available {}",
            request.name, request.quantity, item.quantity
        )));
    }
    let item = item.clone();
    drop(inventory);

    let cart = users
        .cart_mut(user.id)
        .ok_or_else(|| AppError::Forbidden("only clients have a cart".to_string()))?;
    cart.add_item(item, request.quantity)?;
    let response = CartResponse {
        cart: cart.clone(),
        total: cart.calculate_total(),
    };
    users.flush()?;

    Ok(Json(response))
}

/// Remove every cart entry matching an item name.
#[tracing::instrument(skip_all)]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Json<CartResponse>> {
    let mut users = state.users().lock().await;
    let cart = users
        .cart_mut(user.id)
        .ok_or_else(|| AppError::Forbidden("only clients have a cart".to_string()))?;

    if !cart.remove_item(&request.name) {
        return Err(AppError::BadRequest(format!(
            "item {} is not in the cart",
            request.name
        )));
    }
    let response = CartResponse {
        cart: cart.clone(),
        total: cart.calculate_total(),
    };
    users.flush()?;

    Ok(Json(response))
}

/// The cart total, optionally after a percentage discount.
#[tracing::instrument(skip_all)]
pub async fn total(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<DiscountQuery>,
) -> Result<impl IntoResponse> {
    let users = state.users().lock().await;
    let cart = users
        .cart(user.id)
        .ok_or_else(|| AppError::Forbidden("only clients have a cart".to_string()))?;

    let total = match query.discount_pct {
        Some(pct) => cart.apply_discount(pct)?,
        None => cart.calculate_total(),
    };
    Ok(Json(json!({ "total": total })))
}

/// Check out the cart.
#[tracing::instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse> {
    // Lock order: users, inventory, orders. Holding all three makes the
    // validate-pay-record-adjust sequence atomic with respect to other
    // requests.
    let mut users = state.users().lock().await;
    let mut inventory = state.inventory().lock().await;
    let mut orders = state.orders().lock().await;

    let cart = users
        .cart_mut(user.id)
        .ok_or_else(|| AppError::Forbidden("only clients have a cart".to_string()))?;

    let outcome = CheckoutService::new(&mut inventory, &mut orders, state.gateway())
        .purchase(user.id, cart, &request.payment_info)?;
    users.flush()?;

    Ok(Json(json!({
        "order_id": outcome.order_id,
        "total": outcome.total,
        "status": "Processing",
    })))
}
