//! Business logic services.

pub mod auth;
pub mod checkout;
pub mod payment;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutOutcome, CheckoutService};
pub use payment::{PaymentError, PaymentGateway, StubGateway};
