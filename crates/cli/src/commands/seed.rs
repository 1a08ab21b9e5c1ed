//! Seed the inventory store with a starter catalog.
//!
//! Items go through the furniture factory, so the seed data is validated
//! the same way API input is. Existing items with colliding serial
//! numbers are left alone.

use std::path::Path;

use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{info, warn};

use oakline_server::catalog::{FactoryError, FurnitureFactory};
use oakline_server::store::{InventoryStore, StoreError};

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Store could not be opened or flushed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A seed record failed factory validation.
    #[error("factory error: {0}")]
    Factory(#[from] FactoryError),
}

/// Seed the inventory under `data_dir` with a starter catalog.
///
/// # Errors
///
/// Returns [`SeedError`] when the store cannot be opened or flushed, or
/// when a seed record fails validation.
pub fn inventory(data_dir: &Path) -> Result<usize, SeedError> {
    let factory = FurnitureFactory::new();
    let mut store = InventoryStore::open(data_dir.join("inventory.json"))?;

    let mut seeded = 0;
    for (category, attributes) in starter_catalog() {
        let item = factory.create(category, &attributes)?;
        let serial = item.serial_number.clone();
        match store.add(item) {
            Ok(()) => {
                info!(category, serial = %serial, "seeded item");
                seeded += 1;
            }
            Err(StoreError::Conflict(_)) => {
                warn!(category, serial = %serial, "item already present, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    store.flush()?;
    info!(seeded, total = store.len(), "inventory seeded");
    Ok(seeded)
}

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn starter_catalog() -> Vec<(&'static str, Map<String, Value>)> {
    vec![
        (
            "Chair",
            attrs(json!({
                "name": "Office Chair",
                "description": "Ergonomic swivel chair with lumbar support",
                "price": "120.00",
                "dimensions": "60x60x110 cm",
                "serial_number": "CH-1001",
                "quantity": 10,
                "weight": "12.5",
                "manufacturing_country": "Denmark",
                "has_wheels": true,
                "leg_count": 5,
            })),
        ),
        (
            "Sofa",
            attrs(json!({
                "name": "Linen Sofa",
                "description": "Three-seat sofa with washable linen covers",
                "price": "850.00",
                "dimensions": "220x95x85 cm",
                "serial_number": "SF-2001",
                "quantity": 4,
                "weight": "48.0",
                "manufacturing_country": "Sweden",
                "seat_count": 3,
                "convertible_to_bed": true,
            })),
        ),
        (
            "Table",
            attrs(json!({
                "name": "Oak Dining Table",
                "description": "Solid oak table with extension leaf",
                "price": "640.00",
                "dimensions": "180x90x75 cm",
                "serial_number": "TB-3001",
                "quantity": 6,
                "weight": "55.0",
                "manufacturing_country": "Poland",
                "expandable": true,
                "seat_count": 8,
                "foldable": false,
            })),
        ),
        (
            "Bed",
            attrs(json!({
                "name": "Pine Bed Frame",
                "description": "Queen-size pine frame with under-bed drawers",
                "price": "430.00",
                "dimensions": "160x200x100 cm",
                "serial_number": "BD-4001",
                "quantity": 5,
                "weight": "62.0",
                "manufacturing_country": "Finland",
                "has_storage": true,
                "has_headboard": true,
            })),
        ),
        (
            "Closet",
            attrs(json!({
                "name": "Walnut Wardrobe",
                "description": "Two-door wardrobe with mirror panels",
                "price": "980.00",
                "dimensions": "120x60x210 cm",
                "serial_number": "CL-5001",
                "quantity": 3,
                "weight": "88.0",
                "manufacturing_country": "Germany",
                "has_mirrors": true,
                "shelf_count": 4,
                "door_count": 2,
            })),
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_populates_all_categories() {
        let dir = tempfile::tempdir().unwrap();
        let seeded = inventory(dir.path()).unwrap();
        assert_eq!(seeded, 5);

        let store = InventoryStore::open(dir.path().join("inventory.json")).unwrap();
        assert_eq!(store.len(), 5);
        assert!(store.find_by_name("Office Chair").is_some());
        assert!(store.find_by_name("Walnut Wardrobe").is_some());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(inventory(dir.path()).unwrap(), 5);
        // A second run skips every record instead of failing.
        assert_eq!(inventory(dir.path()).unwrap(), 0);

        let store = InventoryStore::open(dir.path().join("inventory.json")).unwrap();
        assert_eq!(store.len(), 5);
    }
}
