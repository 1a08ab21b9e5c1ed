//! Inventory store: furniture items grouped by category.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::furniture::FurnitureItem;
use crate::store::{StoreError, load_snapshot, save_snapshot};

/// Composable search filter; absent fields do not narrow the result.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Exact name match.
    pub name: Option<String>,
    /// Category tag match.
    pub category: Option<String>,
    /// Inclusive price bounds.
    pub price_range: Option<(Decimal, Decimal)>,
}

/// Owner of all furniture instances, grouped by category tag.
///
/// Within a category, serial numbers are unique. All mutations are
/// in-memory; call [`InventoryStore::flush`] to persist.
#[derive(Debug)]
pub struct InventoryStore {
    path: PathBuf,
    items: BTreeMap<String, Vec<FurnitureItem>>,
}

impl InventoryStore {
    /// Open the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] / [`StoreError::Corrupt`] when an
    /// existing snapshot cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let items = load_snapshot(&path)?;
        Ok(Self { path, items })
    }

    /// The snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of distinct items across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert an item into its category bucket.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the serial number already
    /// exists within the category.
    pub fn add(&mut self, item: FurnitureItem) -> Result<(), StoreError> {
        let category = item.category_tag().to_string();
        let bucket = match self.items.entry(category.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(Vec::new()),
        };
        if bucket
            .iter()
            .any(|existing| existing.serial_number == item.serial_number)
        {
            return Err(StoreError::Conflict(format!(
                "serial number {} already exists in category {category}",
                item.serial_number
            )));
        }
        bucket.push(item);
        Ok(())
    }

    /// Delete the item with the given serial number from a category.
    ///
    /// Returns whether a removal occurred; an absent item is not an
    /// error.
    pub fn remove(&mut self, category: &str, serial_number: &str) -> bool {
        let Some(bucket) = self.items.get_mut(category) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|item| item.serial_number != serial_number);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            self.items.remove(category);
        }
        removed
    }

    /// Overwrite the quantity of the item with the given serial number.
    ///
    /// Returns false when the item is not found.
    pub fn update_quantity(&mut self, category: &str, serial_number: &str, quantity: u32) -> bool {
        self.items
            .get_mut(category)
            .and_then(|bucket| {
                bucket
                    .iter_mut()
                    .find(|item| item.serial_number == serial_number)
            })
            .map(|item| item.quantity = quantity)
            .is_some()
    }

    /// Find an item by exact name across all categories.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&FurnitureItem> {
        self.items
            .values()
            .flatten()
            .find(|item| item.name == name)
    }

    /// Search the inventory; filters AND-compose, no filters returns
    /// every item.
    #[must_use]
    pub fn search(&self, filter: &SearchFilter) -> Vec<&FurnitureItem> {
        self.items
            .iter()
            .filter(|(category, _)| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|wanted| *category == wanted)
            })
            .flat_map(|(_, bucket)| bucket)
            .filter(|item| filter.name.as_ref().is_none_or(|n| item.name == *n))
            .filter(|item| {
                filter.price_range.is_none_or(|(min, max)| {
                    item.price.amount() >= min && item.price.amount() <= max
                })
            })
            .collect()
    }

    /// Whether a batch of (name, quantity) deductions would succeed.
    ///
    /// Quantities for the same name are aggregated before checking, so a
    /// batch that passes here cannot half-apply.
    #[must_use]
    pub fn can_deduct(&self, lines: &[(String, u32)]) -> bool {
        self.check_deduct(lines).is_ok()
    }

    /// Deduct a batch of (name, quantity) lines, all-or-nothing.
    ///
    /// Every line is validated against current stock (aggregating
    /// duplicate names) before any quantity changes; on failure the
    /// store is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown item name or
    /// [`StoreError::InsufficientStock`] for an overdraw.
    pub fn deduct_batch(&mut self, lines: &[(String, u32)]) -> Result<(), StoreError> {
        let wanted = self.check_deduct(lines)?;

        for (name, quantity) in wanted {
            if let Some(item) = self
                .items
                .values_mut()
                .flatten()
                .find(|item| item.name == name)
            {
                item.quantity -= quantity;
                debug!(name = %name, deducted = quantity, remaining = item.quantity, "stock deducted");
            }
        }
        Ok(())
    }

    fn check_deduct(&self, lines: &[(String, u32)]) -> Result<BTreeMap<String, u32>, StoreError> {
        let mut wanted: BTreeMap<String, u32> = BTreeMap::new();
        for (name, quantity) in lines {
            *wanted.entry(name.clone()).or_default() += quantity;
        }

        for (name, quantity) in &wanted {
            let item = self
                .find_by_name(name)
                .ok_or_else(|| StoreError::NotFound(format!("item {name}")))?;
            if item.quantity < *quantity {
                return Err(StoreError::InsufficientStock {
                    name: name.clone(),
                    requested: *quantity,
                    available: item.quantity,
                });
            }
        }
        Ok(wanted)
    }

    /// Persist the whole store to its snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the write fails; in-memory state
    /// is unaffected either way.
    pub fn flush(&self) -> Result<(), StoreError> {
        save_snapshot(&self.path, &self.items)
    }
}
