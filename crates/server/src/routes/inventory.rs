//! Inventory route handlers.
//!
//! Public search plus management-only mutations.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::{AppError, Result};
use crate::middleware::RequireManagement;
use crate::models::furniture::FurnitureItem;
use crate::state::AppState;
use crate::store::SearchFilter;

// =============================================================================
// Request Types
// =============================================================================

/// Search query parameters. All optional; filters AND-compose.
#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl SearchQuery {
    fn into_filter(self) -> SearchFilter {
        let price_range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => Some((
                min.unwrap_or(Decimal::MIN),
                max.unwrap_or(Decimal::MAX),
            )),
        };
        SearchFilter {
            name: self.name,
            category: self.category,
            price_range,
        }
    }
}

/// New item request: a category tag plus the flat attribute mapping the
/// factory validates.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub category: String,
    pub attributes: Map<String, Value>,
}

/// Quantity update request.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub category: String,
    pub serial_number: String,
    pub quantity: u32,
}

/// Item removal request.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub category: String,
    pub serial_number: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Search the inventory. An empty result is a 404, not an empty array.
#[tracing::instrument(skip_all)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<FurnitureItem>>> {
    let inventory = state.inventory().lock().await;
    let items: Vec<FurnitureItem> = inventory
        .search(&query.into_filter())
        .into_iter()
        .cloned()
        .collect();
    if items.is_empty() {
        return Err(AppError::NotFound("no items matched".to_string()));
    }
    Ok(Json(items))
}

/// Add a new item to the inventory (management only).
#[tracing::instrument(skip_all)]
pub async fn create_item(
    State(state): State<AppState>,
    RequireManagement(_): RequireManagement,
    Json(request): Json<CreateItemRequest>,
) -> Result<impl IntoResponse> {
    let item = state.factory().create(&request.category, &request.attributes)?;

    let mut inventory = state.inventory().lock().await;
    inventory.add(item.clone())?;
    inventory.flush()?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Overwrite an item's quantity (management only).
#[tracing::instrument(skip_all)]
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireManagement(_): RequireManagement,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<impl IntoResponse> {
    let mut inventory = state.inventory().lock().await;
    if !inventory.update_quantity(&request.category, &request.serial_number, request.quantity) {
        return Err(AppError::NotFound(format!(
            "item {} in category {}",
            request.serial_number, request.category
        )));
    }
    inventory.flush()?;
    Ok(Json(json!({ "message": "quantity updated" })))
}

/// Remove an item from the inventory (management only).
#[tracing::instrument(skip_all)]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireManagement(_): RequireManagement,
    Json(request): Json<RemoveItemRequest>,
) -> Result<impl IntoResponse> {
    let mut inventory = state.inventory().lock().await;
    if !inventory.remove(&request.category, &request.serial_number) {
        return Err(AppError::NotFound(format!(
            "item {} in category {}",
            request.serial_number, request.category
        )));
    }
    inventory.flush()?;
    Ok(Json(json!({ "message": "item removed" })))
}
