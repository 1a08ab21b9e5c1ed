//! Furniture catalog types.
//!
//! A catalog product is one shared record ([`FurnitureItem`]) plus a
//! category payload ([`CategoryDetails`]). The payload is a tagged union
//! rather than an inheritance hierarchy so new categories are closed
//! variants with their own fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use oakline_core::{Price, PriceError};

/// Category-specific attributes for a furniture item.
///
/// Serialized with an internal `category` tag, e.g.
/// `{"category": "Chair", "has_wheels": true, "leg_count": 5}`.
/// Dynamically registered categories use the `Custom` variant and keep
/// their attributes as an opaque JSON map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum CategoryDetails {
    Chair {
        has_wheels: bool,
        leg_count: u32,
    },
    Sofa {
        seat_count: u32,
        convertible_to_bed: bool,
    },
    Table {
        expandable: bool,
        seat_count: u32,
        foldable: bool,
    },
    Bed {
        has_storage: bool,
        has_headboard: bool,
    },
    Closet {
        has_mirrors: bool,
        shelf_count: u32,
        door_count: u32,
    },
    Custom {
        tag: String,
        attributes: Map<String, Value>,
    },
}

impl CategoryDetails {
    /// The category discriminator string, e.g. `"Chair"`.
    #[must_use]
    pub fn category_tag(&self) -> &str {
        match self {
            Self::Chair { .. } => "Chair",
            Self::Sofa { .. } => "Sofa",
            Self::Table { .. } => "Table",
            Self::Bed { .. } => "Bed",
            Self::Closet { .. } => "Closet",
            Self::Custom { tag, .. } => tag,
        }
    }
}

/// A catalog product record.
///
/// Constructed through the factory, which validates every field; code that
/// mutates an item afterwards only touches `quantity` (stock deduction)
/// or `price` (discount/tax).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub dimensions: String,
    /// Unique within the item's category.
    pub serial_number: String,
    pub quantity: u32,
    pub weight: Decimal,
    pub manufacturing_country: String,
    #[serde(flatten)]
    pub details: CategoryDetails,
}

impl FurnitureItem {
    /// The category discriminator string.
    #[must_use]
    pub fn category_tag(&self) -> &str {
        self.details.category_tag()
    }

    /// Whether the item has no stock left.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Apply a percentage discount to the item's price.
    ///
    /// A discount that would drive the price to zero (100%) leaves the
    /// price unchanged, preserving the positive-price invariant.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::InvalidPercentage`] if `pct` is outside
    /// `[0, 100]`.
    pub fn apply_discount(&mut self, pct: Decimal) -> Result<(), PriceError> {
        let new_amount = self.price.discounted(pct)?;
        if let Ok(new_price) = Price::new(new_amount) {
            self.price = new_price;
        }
        Ok(())
    }

    /// Apply tax to the item's price at the given rate.
    pub fn apply_tax(&mut self, rate: Decimal) {
        self.price = self.price.with_tax(rate);
    }
}

impl std::fmt::Display for FurnitureItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} | Price: {} | Stock: {}",
            self.name, self.description, self.price, self.quantity
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::dec;

    use super::*;

    /// Build a chair for tests across the crate.
    pub(crate) fn office_chair(quantity: u32) -> FurnitureItem {
        FurnitureItem {
            name: "Office Chair".to_string(),
            description: "Ergonomic swivel chair".to_string(),
            price: Price::new(dec!(120.00)).unwrap(),
            dimensions: "60x60x110cm".to_string(),
            serial_number: "CH-1001".to_string(),
            quantity,
            weight: dec!(12.5),
            manufacturing_country: "Denmark".to_string(),
            details: CategoryDetails::Chair {
                has_wheels: true,
                leg_count: 5,
            },
        }
    }

    #[test]
    fn test_category_tag() {
        assert_eq!(office_chair(1).category_tag(), "Chair");

        let custom = CategoryDetails::Custom {
            tag: "BeanBag".to_string(),
            attributes: Map::new(),
        };
        assert_eq!(custom.category_tag(), "BeanBag");
    }

    #[test]
    fn test_out_of_stock() {
        assert!(office_chair(0).is_out_of_stock());
        assert!(!office_chair(3).is_out_of_stock());
    }

    #[test]
    fn test_apply_discount_keeps_positive_price() {
        let mut item = office_chair(1);
        item.apply_discount(dec!(50)).unwrap();
        assert_eq!(item.price.amount(), dec!(60.00));

        // 100% discount would zero the price; the old price survives.
        item.apply_discount(dec!(100)).unwrap();
        assert_eq!(item.price.amount(), dec!(60.00));

        assert!(item.apply_discount(dec!(101)).is_err());
    }

    #[test]
    fn test_apply_tax() {
        let mut item = office_chair(1);
        item.apply_tax(dec!(0.17));
        assert_eq!(item.price.amount(), dec!(140.40));
    }

    #[test]
    fn test_serde_roundtrip_with_category_tag() {
        let item = office_chair(4);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["category"], "Chair");
        assert_eq!(json["has_wheels"], true);

        let back: FurnitureItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
