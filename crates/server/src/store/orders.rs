//! Order ledger: append-only purchase history.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use oakline_core::{OrderId, OrderStatus, UserId};

use crate::models::order::{Order, OrderLine};
use crate::store::{StoreError, load_snapshot, save_snapshot};

/// Record of every order ever placed, in insertion order.
///
/// Orders are never deleted; cancellation is a status transition. All
/// mutations are in-memory until [`OrderLedger::flush`].
#[derive(Debug)]
pub struct OrderLedger {
    path: PathBuf,
    orders: Vec<Order>,
}

impl OrderLedger {
    /// Open the ledger at `path`. A missing file yields an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] / [`StoreError::Corrupt`] when an
    /// existing snapshot cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let orders = load_snapshot(&path)?;
        Ok(Self { path, orders })
    }

    /// The snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Record a new order and return its generated id.
    ///
    /// The order starts in [`OrderStatus::Processing`] and is stamped
    /// with the current time.
    pub fn create_order(
        &mut self,
        client_id: UserId,
        items: Vec<OrderLine>,
        total_price: Decimal,
        payment_info: String,
    ) -> OrderId {
        let order_id = OrderId::generate();
        self.orders.push(Order {
            order_id,
            client_id,
            items,
            total_price,
            payment_info,
            status: OrderStatus::default(),
            order_date: Utc::now(),
        });
        info!(%order_id, %client_id, %total_price, "order recorded");
        order_id
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.order_id == order_id)
    }

    /// Look up an order by id, scoped to its owner.
    ///
    /// Returns `None` for an order that exists but belongs to another
    /// client, so callers cannot distinguish the two cases.
    #[must_use]
    pub fn get_for_client(&self, order_id: OrderId, client_id: UserId) -> Option<&Order> {
        self.get(order_id)
            .filter(|order| order.client_id == client_id)
    }

    /// All orders placed by a client, oldest first.
    #[must_use]
    pub fn history(&self, client_id: UserId) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.client_id == client_id)
            .collect()
    }

    /// Every order in the ledger, oldest first.
    #[must_use]
    pub fn all(&self) -> &[Order] {
        &self.orders
    }

    /// Move an order to a new status.
    ///
    /// Returns false when the order does not exist or the transition is
    /// not allowed; terminal states are never left.
    pub fn update_status(&mut self, order_id: OrderId, status: OrderStatus) -> bool {
        let Some(order) = self
            .orders
            .iter_mut()
            .find(|order| order.order_id == order_id)
        else {
            warn!(%order_id, "status update for unknown order");
            return false;
        };
        if !order.status.can_transition_to(status) {
            warn!(%order_id, from = %order.status, to = %status, "refused status transition");
            return false;
        }
        info!(%order_id, from = %order.status, to = %status, "order status updated");
        order.status = status;
        true
    }

    /// Cancel an order. Equivalent to a transition to
    /// [`OrderStatus::Cancelled`].
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        self.update_status(order_id, OrderStatus::Cancelled)
    }

    /// Persist the whole ledger to its snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the write fails.
    pub fn flush(&self) -> Result<(), StoreError> {
        save_snapshot(&self.path, &self.orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;
    use crate::models::cart::CartEntry;
    use crate::models::furniture::tests::office_chair;

    fn ledger() -> (tempfile::TempDir, OrderLedger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = OrderLedger::open(dir.path().join("orders.json")).unwrap();
        (dir, ledger)
    }

    fn chair_lines() -> Vec<OrderLine> {
        let entry = CartEntry {
            item: office_chair(10),
            quantity: 2,
        };
        vec![OrderLine::from(&entry)]
    }

    #[test]
    fn test_create_order_starts_processing() {
        let (_dir, mut ledger) = ledger();
        let id = ledger.create_order(
            oakline_core::UserId::new(1),
            chair_lines(),
            dec!(240.00),
            "card-on-file".to_string(),
        );

        let order = ledger.get(id).unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.total_price, dec!(240.00));
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_get_for_client_hides_other_clients_orders() {
        let (_dir, mut ledger) = ledger();
        let owner = oakline_core::UserId::new(1);
        let other = oakline_core::UserId::new(2);
        let id = ledger.create_order(owner, chair_lines(), dec!(240.00), "pay".to_string());

        assert!(ledger.get_for_client(id, owner).is_some());
        assert!(ledger.get_for_client(id, other).is_none());
    }

    #[test]
    fn test_history_is_insertion_ordered_per_client() {
        let (_dir, mut ledger) = ledger();
        let client = oakline_core::UserId::new(1);
        let first = ledger.create_order(client, chair_lines(), dec!(240.00), "pay".to_string());
        ledger.create_order(
            oakline_core::UserId::new(2),
            chair_lines(),
            dec!(240.00),
            "pay".to_string(),
        );
        let second = ledger.create_order(client, chair_lines(), dec!(120.00), "pay".to_string());

        let history = ledger.history(client);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].order_id, first);
        assert_eq!(history[1].order_id, second);
    }

    #[test]
    fn test_update_status_refuses_leaving_terminal_states() {
        let (_dir, mut ledger) = ledger();
        let id = ledger.create_order(
            oakline_core::UserId::new(1),
            chair_lines(),
            dec!(240.00),
            "pay".to_string(),
        );

        assert!(ledger.update_status(id, OrderStatus::Shipped));
        assert!(!ledger.update_status(id, OrderStatus::Processing));
        assert!(!ledger.cancel(id));
        assert_eq!(ledger.get(id).unwrap().status, OrderStatus::Shipped);

        assert!(!ledger.update_status(OrderId::generate(), OrderStatus::Shipped));
    }

    #[test]
    fn test_cancel_is_terminal() {
        let (_dir, mut ledger) = ledger();
        let id = ledger.create_order(
            oakline_core::UserId::new(1),
            chair_lines(),
            dec!(240.00),
            "pay".to_string(),
        );

        assert!(ledger.cancel(id));
        assert!(!ledger.update_status(id, OrderStatus::Shipped));
        assert_eq!(ledger.get(id).unwrap().status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_flush_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");

        let mut ledger = OrderLedger::open(&path).unwrap();
        let id = ledger.create_order(
            oakline_core::UserId::new(7),
            chair_lines(),
            dec!(240.00),
            "pay".to_string(),
        );
        ledger.flush().unwrap();

        let reloaded = OrderLedger::open(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        let order = reloaded.get(id).unwrap();
        assert_eq!(order.client_id, oakline_core::UserId::new(7));
        assert_eq!(order.items[0].serial_number, "CH-1001");
    }
}
