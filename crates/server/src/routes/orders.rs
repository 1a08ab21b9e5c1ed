//! Order route handlers.
//!
//! Order history, lookup and status transitions. Clients see only their
//! own orders; management sees everything and owns status updates.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use oakline_core::{OrderId, OrderStatus, Role};

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, RequireManagement};
use crate::models::order::Order;
use crate::state::AppState;

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Order history: the client's own orders, or every order for
/// management.
#[tracing::instrument(skip_all)]
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = state.orders().lock().await;
    let history: Vec<Order> = match user.role {
        Role::Client => orders.history(user.id).into_iter().cloned().collect(),
        Role::Management => orders.all().to_vec(),
    };
    Ok(Json(history))
}

/// Look up one order. Ownership-scoped for clients: an order belonging
/// to another client is indistinguishable from a missing one.
#[tracing::instrument(skip_all)]
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Order>> {
    let orders = state.orders().lock().await;
    let order = match user.role {
        Role::Client => orders.get_for_client(order_id, user.id),
        Role::Management => orders.get(order_id),
    };
    order
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))
}

/// Move an order to a new status (management only).
#[tracing::instrument(skip_all)]
pub async fn update_status(
    State(state): State<AppState>,
    RequireManagement(_): RequireManagement,
    Path(order_id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let mut orders = state.orders().lock().await;
    if orders.get(order_id).is_none() {
        return Err(AppError::NotFound(format!("order {order_id}")));
    }
    if !orders.update_status(order_id, request.status) {
        return Err(AppError::BadRequest(format!(
            "order {order_id} cannot move to {}",
            request.status
        )));
    }
    orders.flush()?;
    Ok(Json(json!({ "message": "status updated" })))
}

/// Cancel an order. A client may cancel their own order; management may
/// cancel any.
#[tracing::instrument(skip_all)]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let mut orders = state.orders().lock().await;

    let visible = match user.role {
        Role::Client => orders.get_for_client(order_id, user.id).is_some(),
        Role::Management => orders.get(order_id).is_some(),
    };
    if !visible {
        return Err(AppError::NotFound(format!("order {order_id}")));
    }
    if !orders.cancel(order_id) {
        return Err(AppError::BadRequest(format!(
            "order {order_id} cannot be cancelled"
        )));
    }
    orders.flush()?;
    Ok(Json(json!({ "message": "order cancelled" })))
}
