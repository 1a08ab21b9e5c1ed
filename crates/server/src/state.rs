//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::FurnitureFactory;
use crate::config::ServerConfig;
use crate::services::payment::{PaymentGateway, StubGateway};
use crate::store::{InventoryStore, OrderLedger, StoreError, UserDirectory};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The three stores sit behind async
/// mutexes; handlers that need more than one must take them in the
/// fixed order users, inventory, orders to stay deadlock-free.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    factory: FurnitureFactory,
    users: Mutex<UserDirectory>,
    inventory: Mutex<InventoryStore>,
    orders: Mutex<OrderLedger>,
    gateway: Box<dyn PaymentGateway>,
}

impl AppState {
    /// Create a new application state, opening all three stores from the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a store snapshot exists but cannot be
    /// read.
    pub fn new(config: ServerConfig) -> Result<Self, StoreError> {
        let users = UserDirectory::open(config.users_path())?;
        let inventory = InventoryStore::open(config.inventory_path())?;
        let orders = OrderLedger::open(config.orders_path())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                factory: FurnitureFactory::new(),
                users: Mutex::new(users),
                inventory: Mutex::new(inventory),
                orders: Mutex::new(orders),
                gateway: Box::new(StubGateway),
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the furniture factory.
    #[must_use]
    pub fn factory(&self) -> &FurnitureFactory {
        &self.inner.factory
    }

    /// Get the user directory lock.
    #[must_use]
    pub fn users(&self) -> &Mutex<UserDirectory> {
        &self.inner.users
    }

    /// Get the inventory store lock.
    #[must_use]
    pub fn inventory(&self) -> &Mutex<InventoryStore> {
        &self.inner.inventory
    }

    /// Get the order ledger lock.
    #[must_use]
    pub fn orders(&self) -> &Mutex<OrderLedger> {
        &self.inner.orders
    }

    /// Get the payment gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.inner.gateway.as_ref()
    }
}
