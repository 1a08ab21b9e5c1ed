//! Checkout orchestration.
//!
//! The one place where cart, inventory, payment and the order ledger
//! coordinate. The protocol is linear, no retries: validate, price,
//! pay, record, adjust stock, clear the cart. Every failure before the
//! stock adjustment leaves cart and inventory untouched; a stock
//! adjustment failure after recording is compensated by cancelling the
//! freshly created order.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, info};

use oakline_core::{OrderId, UserId};

use crate::models::cart::Cart;
use crate::models::order::OrderLine;
use crate::services::payment::{PaymentError, PaymentGateway};
use crate::store::{InventoryStore, OrderLedger, StoreError};

/// Errors that abort a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no entries.
    #[error("cart is empty")]
    EmptyCart,

    /// Some entry is absent from inventory or overdraws its stock.
    #[error("insufficient stock for {0}")]
    OutOfStock(String),

    /// The gateway declined the charge.
    #[error("payment failed")]
    PaymentFailed,

    /// The gateway rejected the charge request itself.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutOutcome {
    pub order_id: OrderId,
    pub total: Decimal,
}

/// Checkout orchestrator.
///
/// Borrows both stores exclusively for the duration of one purchase, so
/// validation and stock adjustment cannot interleave with another
/// mutation of the same inventory.
pub struct CheckoutService<'a> {
    inventory: &'a mut InventoryStore,
    ledger: &'a mut OrderLedger,
    gateway: &'a dyn PaymentGateway,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub fn new(
        inventory: &'a mut InventoryStore,
        ledger: &'a mut OrderLedger,
        gateway: &'a dyn PaymentGateway,
    ) -> Self {
        Self {
            inventory,
            ledger,
            gateway,
        }
    }

    /// Run the checkout protocol for a client's cart.
    ///
    /// On success the order is recorded and persisted, stock is
    /// deducted and persisted, and the cart is cleared. On any failure
    /// the cart keeps its entries.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for a cart with no entries,
    /// [`CheckoutError::OutOfStock`] when validation against current
    /// stock fails, [`CheckoutError::PaymentFailed`] when the gateway
    /// declines, and [`CheckoutError::Store`] for persistence failures.
    pub fn purchase(
        &mut self,
        client_id: UserId,
        cart: &mut Cart,
        payment_info: &str,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        // Validating
        if cart.entries().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let lines: Vec<(String, u32)> = cart
            .entries()
            .iter()
            .map(|entry| (entry.item.name.clone(), entry.quantity))
            .collect();
        if !cart.validate_cart(Some(self.inventory)) || !self.inventory.can_deduct(&lines) {
            let name = first_short_item(self.inventory, &lines);
            return Err(CheckoutError::OutOfStock(name));
        }
        debug!(%client_id, entries = lines.len(), "cart validated");

        // Pricing
        let total = cart.calculate_total();
        if total == Decimal::ZERO {
            return Err(CheckoutError::EmptyCart);
        }

        // Paying
        if !self.gateway.process_payment(payment_info, total)? {
            return Err(CheckoutError::PaymentFailed);
        }

        // Recording
        let order_lines: Vec<OrderLine> = cart.entries().iter().map(OrderLine::from).collect();
        let order_id =
            self.ledger
                .create_order(client_id, order_lines, total, payment_info.to_string());
        self.ledger.flush()?;

        // Adjusting. A failure here means stock changed between the
        // validation above and now, which cannot happen while we hold
        // both stores; compensate anyway rather than strand a paid
        // order against undeducted stock.
        if let Err(e) = self.inventory.deduct_batch(&lines) {
            error!(%order_id, error = %e, "stock adjustment failed after payment, cancelling order");
            self.ledger.cancel(order_id);
            self.ledger.flush()?;
            return Err(e.into());
        }
        self.inventory.flush()?;

        // Cleared
        cart.clear();
        info!(%order_id, %client_id, %total, "checkout complete");
        Ok(CheckoutOutcome { order_id, total })
    }
}

/// Name the first line that cannot be satisfied, for the error message.
fn first_short_item(inventory: &InventoryStore, lines: &[(String, u32)]) -> String {
    lines
        .iter()
        .find(|(name, quantity)| {
            inventory
                .find_by_name(name)
                .is_none_or(|item| item.quantity < *quantity)
        })
        .map_or_else(
            || {
                lines
                    .first()
                    .map_or_else(String::new, |(name, _)| name.clone())
            },
            |(name, _)| name.clone(),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;
    use crate::models::furniture::tests::office_chair;
    use crate::services::payment::StubGateway;

    struct DecliningGateway;

    impl PaymentGateway for DecliningGateway {
        fn process_payment(&self, _: &str, _: Decimal) -> Result<bool, PaymentError> {
            Ok(false)
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        inventory: InventoryStore,
        ledger: OrderLedger,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut inventory = InventoryStore::open(dir.path().join("inventory.json")).unwrap();
        inventory.add(office_chair(10)).unwrap();
        let ledger = OrderLedger::open(dir.path().join("orders.json")).unwrap();
        Fixture {
            _dir: dir,
            inventory,
            ledger,
        }
    }

    fn cart_with_chairs(quantity: u32) -> Cart {
        let mut cart = Cart::new();
        cart.add_item(office_chair(10), quantity).unwrap();
        cart
    }

    #[test]
    fn test_successful_checkout() {
        let mut fx = fixture();
        let mut cart = cart_with_chairs(2);
        let client = UserId::new(1);

        let outcome = CheckoutService::new(&mut fx.inventory, &mut fx.ledger, &StubGateway)
            .purchase(client, &mut cart, "card-on-file")
            .unwrap();

        assert_eq!(outcome.total, dec!(240.00));
        assert!(cart.entries().is_empty());
        assert_eq!(fx.inventory.find_by_name("Office Chair").unwrap().quantity, 8);

        let order = fx.ledger.get_for_client(outcome.order_id, client).unwrap();
        assert_eq!(order.total_price, dec!(240.00));
        assert_eq!(order.status, oakline_core::OrderStatus::Processing);

        // Both stores were persisted.
        let reloaded = InventoryStore::open(fx.inventory.path()).unwrap();
        assert_eq!(reloaded.find_by_name("Office Chair").unwrap().quantity, 8);
        let reloaded = OrderLedger::open(fx.ledger.path()).unwrap();
        assert!(reloaded.get(outcome.order_id).is_some());
    }

    #[test]
    fn test_oversell_is_rejected_before_payment() {
        let mut fx = fixture();
        let mut cart = cart_with_chairs(11);

        let result = CheckoutService::new(&mut fx.inventory, &mut fx.ledger, &StubGateway)
            .purchase(UserId::new(1), &mut cart, "card");

        assert!(matches!(result, Err(CheckoutError::OutOfStock(ref name)) if name == "Office Chair"));
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(fx.inventory.find_by_name("Office Chair").unwrap().quantity, 10);
        assert!(fx.ledger.is_empty());
    }

    #[test]
    fn test_duplicate_entries_are_checked_in_aggregate() {
        let mut fx = fixture();
        let mut cart = Cart::new();
        cart.add_item(office_chair(10), 6).unwrap();
        cart.add_item(office_chair(10), 6).unwrap();

        let result = CheckoutService::new(&mut fx.inventory, &mut fx.ledger, &StubGateway)
            .purchase(UserId::new(1), &mut cart, "card");

        assert!(matches!(result, Err(CheckoutError::OutOfStock(_))));
        assert_eq!(fx.inventory.find_by_name("Office Chair").unwrap().quantity, 10);
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let mut fx = fixture();
        let mut cart = Cart::new();

        let result = CheckoutService::new(&mut fx.inventory, &mut fx.ledger, &StubGateway)
            .purchase(UserId::new(1), &mut cart, "card");

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_declined_payment_leaves_everything_untouched() {
        let mut fx = fixture();
        let mut cart = cart_with_chairs(2);

        let result = CheckoutService::new(&mut fx.inventory, &mut fx.ledger, &DecliningGateway)
            .purchase(UserId::new(1), &mut cart, "card");

        assert!(matches!(result, Err(CheckoutError::PaymentFailed)));
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(fx.inventory.find_by_name("Office Chair").unwrap().quantity, 10);
        assert!(fx.ledger.is_empty());
    }
}
