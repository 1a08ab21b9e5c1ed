//! Per-user shopping cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use oakline_core::price::{PriceError, calc_discount};

use crate::models::furniture::FurnitureItem;
use crate::store::inventory::InventoryStore;

/// Errors raised by cart mutation and pricing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Requested quantity must be greater than zero.
    #[error("quantity must be greater than 0")]
    InvalidQuantity,
    /// Discount percentage outside `[0, 100]`.
    #[error("discount percentage must be between 0 and 100")]
    InvalidPercentage,
}

/// One (item, requested quantity) pairing inside a cart.
///
/// The item is a snapshot taken at add time; stock checks always go back
/// to the live inventory by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub item: FurnitureItem,
    pub quantity: u32,
}

/// A user's shopping cart: an ordered sequence of entries.
///
/// Adding the same item twice appends a second entry; entries are never
/// merged. `remove_item` compensates by removing every entry with a
/// matching name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The cart's entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry for `quantity` units of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity.
    pub fn add_item(&mut self, item: FurnitureItem, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        self.entries.push(CartEntry { item, quantity });
        Ok(())
    }

    /// Remove every entry whose item name matches.
    ///
    /// Returns whether anything was removed.
    pub fn remove_item(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.item.name != name);
        self.entries.len() != before
    }

    /// Sum of `price * quantity` over all entries. Zero for an empty cart.
    #[must_use]
    pub fn calculate_total(&self) -> Decimal {
        self.entries
            .iter()
            .map(|entry| entry.item.price.amount() * Decimal::from(entry.quantity))
            .sum()
    }

    /// The cart total after a percentage discount, rounded to 2 decimal
    /// places.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPercentage`] if `pct` is outside
    /// `[0, 100]`.
    pub fn apply_discount(&self, pct: Decimal) -> Result<Decimal, CartError> {
        calc_discount(self.calculate_total(), pct).map_err(|e| match e {
            PriceError::InvalidPercentage | PriceError::NotPositive => CartError::InvalidPercentage,
        })
    }

    /// Check every entry against current inventory stock.
    ///
    /// False when an entry's item is absent from inventory or its
    /// requested quantity exceeds the available quantity. With no
    /// inventory supplied the cart trivially validates, so cart-only
    /// contexts keep working.
    #[must_use]
    pub fn validate_cart(&self, inventory: Option<&InventoryStore>) -> bool {
        let Some(inventory) = inventory else {
            return true;
        };

        self.entries.iter().all(|entry| {
            inventory
                .find_by_name(&entry.item.name)
                .is_some_and(|stocked| stocked.quantity >= entry.quantity)
        })
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;
    use crate::models::furniture::tests::office_chair;

    #[test]
    fn test_add_item_rejects_zero_quantity() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_item(office_chair(10), 0),
            Err(CartError::InvalidQuantity)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_duplicate_adds_stay_separate_entries() {
        let mut cart = Cart::new();
        cart.add_item(office_chair(10), 1).unwrap();
        cart.add_item(office_chair(10), 2).unwrap();
        assert_eq!(cart.entries().len(), 2);

        // remove_item takes all of them out again
        assert!(cart.remove_item("Office Chair"));
        assert!(cart.is_empty());
        assert!(!cart.remove_item("Office Chair"));
    }

    #[test]
    fn test_calculate_total() {
        let mut cart = Cart::new();
        assert_eq!(cart.calculate_total(), Decimal::ZERO);

        cart.add_item(office_chair(10), 2).unwrap();
        assert_eq!(cart.calculate_total(), dec!(240.00));
    }

    #[test]
    fn test_apply_discount() {
        let mut cart = Cart::new();
        cart.add_item(office_chair(10), 2).unwrap();

        assert_eq!(cart.apply_discount(dec!(10)).unwrap(), dec!(216.00));
        assert_eq!(
            cart.apply_discount(dec!(-0.1)),
            Err(CartError::InvalidPercentage)
        );
        assert_eq!(
            cart.apply_discount(dec!(100.1)),
            Err(CartError::InvalidPercentage)
        );
    }

    #[test]
    fn test_validate_without_inventory_is_trivially_true() {
        let mut cart = Cart::new();
        cart.add_item(office_chair(0), 5).unwrap();
        assert!(cart.validate_cart(None));
    }
}
