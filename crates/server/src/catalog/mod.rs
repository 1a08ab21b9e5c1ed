//! Catalog construction: the furniture factory.

pub mod factory;

pub use factory::{CategoryBuilder, FactoryError, FurnitureFactory};
