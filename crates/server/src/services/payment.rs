//! Payment gateway seam.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

/// Errors from the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The charge amount was zero or negative.
    #[error("invalid payment amount: {0}")]
    InvalidAmount(Decimal),
}

/// A payment processor.
///
/// The seam for a future real integration; the contract is charge an
/// amount against opaque payment info and report whether the charge
/// went through.
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` against `payment_info`. Returns whether the
    /// charge succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidAmount`] when `amount` is not
    /// positive.
    fn process_payment(&self, payment_info: &str, amount: Decimal) -> Result<bool, PaymentError>;
}

/// Stub gateway that approves every well-formed charge.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubGateway;

impl PaymentGateway for StubGateway {
    fn process_payment(&self, _payment_info: &str, amount: Decimal) -> Result<bool, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(amount));
        }
        info!(%amount, "payment approved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_stub_gateway_rejects_non_positive_amounts() {
        let gateway = StubGateway;
        assert!(matches!(
            gateway.process_payment("card", dec!(0)),
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(matches!(
            gateway.process_payment("card", dec!(-5)),
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(gateway.process_payment("card", dec!(240.00)).unwrap());
    }
}
