//! Order records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use oakline_core::{OrderId, OrderStatus, Price, UserId};

use crate::models::cart::CartEntry;

/// One purchased line inside an order.
///
/// A snapshot of the cart entry at checkout time - name, serial, category
/// and unit price are copied so later inventory mutation cannot rewrite
/// order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub serial_number: String,
    pub category: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl From<&CartEntry> for OrderLine {
    fn from(entry: &CartEntry) -> Self {
        Self {
            name: entry.item.name.clone(),
            serial_number: entry.item.serial_number.clone(),
            category: entry.item.category_tag().to_string(),
            unit_price: entry.item.price,
            quantity: entry.quantity,
        }
    }
}

/// A completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub client_id: UserId,
    pub items: Vec<OrderLine>,
    pub total_price: Decimal,
    /// Opaque payment reference; never interpreted by the store.
    pub payment_info: String,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;
    use crate::models::furniture::tests::office_chair;

    #[test]
    fn test_order_line_snapshots_cart_entry() {
        let entry = CartEntry {
            item: office_chair(10),
            quantity: 2,
        };
        let line = OrderLine::from(&entry);
        assert_eq!(line.name, "Office Chair");
        assert_eq!(line.serial_number, "CH-1001");
        assert_eq!(line.category, "Chair");
        assert_eq!(line.unit_price.amount(), dec!(120.00));
        assert_eq!(line.quantity, 2);
    }
}
