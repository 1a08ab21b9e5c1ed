//! Oakline Core - Shared types library.
//!
//! This crate provides common types used across all Oakline components:
//! - `server` - The furniture store HTTP API
//! - `cli` - Command-line tools for seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no file access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
