//! File-backed stores for inventory, orders and users.
//!
//! Each store keeps its working set in memory and round-trips it to a
//! JSON file wholesale: `load` at startup, `flush` on demand. Mutations
//! touch only memory until flushed - the durability boundary is explicit.
//! A missing file on load yields an empty store; a write failure on
//! flush is surfaced to the caller, never swallowed.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod inventory;
pub mod orders;
pub mod users;

pub use inventory::{InventoryStore, SearchFilter};
pub use orders::OrderLedger;
pub use users::UserDirectory;

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O failed on load or flush.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted file exists but cannot be decoded.
    #[error("store data corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A stock deduction would overdraw an item.
    #[error("insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: u32,
        available: u32,
    },
}

/// Load a JSON snapshot, defaulting when the file does not exist.
///
/// # Errors
///
/// Returns [`StoreError::Io`] for unreadable files and
/// [`StoreError::Corrupt`] for undecodable contents.
pub(crate) fn load_snapshot<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write a JSON snapshot, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`StoreError::Io`] when the file cannot be written.
pub(crate) fn save_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
