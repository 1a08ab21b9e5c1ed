//! Domain models for the furniture store.
//!
//! These types represent validated domain objects separate from storage
//! and wire formats.

pub mod cart;
pub mod furniture;
pub mod order;
pub mod session;
pub mod user;

pub use cart::{Cart, CartEntry, CartError};
pub use furniture::{CategoryDetails, FurnitureItem};
pub use order::{Order, OrderLine};
pub use session::{SessionUser, session_keys};
pub use user::User;
