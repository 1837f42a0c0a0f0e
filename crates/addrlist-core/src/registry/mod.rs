//! Plugin-based device client registry
//!
//! The registry maps a client type name to a factory, so the binary can pick
//! a device client from configuration without hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use addrlist_core::registry::ClientRegistry;
//! use addrlist_core::config::ClientConfig;
//!
//! let registry = ClientRegistry::new();
//! addrlist_client_bigip::register(&registry);
//!
//! let config = ClientConfig::Bigip { ... };
//! let client = registry.create_client(&config)?;
//! ```
//!
//! ## Registration
//!
//! Client crates expose a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &ClientRegistry) {
//!     registry.register_client("bigip", Box::new(BigIpFactory));
//! }
//! ```

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::traits::{DeviceClient, DeviceClientFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::Other("Client registry lock poisoned".to_string())
}

/// Registry of device client factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, Box<dyn DeviceClientFactory>>>,
}

impl ClientRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `memory` client registered
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_client("memory", Box::new(crate::device::MemoryDeviceClientFactory));
        registry
    }

    /// Register a device client factory
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_client(&self, name: impl Into<String>, factory: Box<dyn DeviceClientFactory>) {
        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        clients.insert(name.into(), factory);
    }

    /// Create a device client from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DeviceClient>)`: Created client instance
    /// - `Err(Error)`: If the configuration is invalid, the client type is not
    ///   registered, or creation fails
    pub fn create_client(&self, config: &ClientConfig) -> Result<Box<dyn DeviceClient>> {
        config.validate()?;

        let client_type = config.type_name();
        let clients = self.clients.read().map_err(poisoned)?;

        let factory = clients
            .get(client_type)
            .ok_or_else(|| Error::config(format!("Unknown client type: {}", client_type)))?;

        factory.create(config)
    }

    /// List all registered client types, sorted
    pub fn list_clients(&self) -> Vec<String> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = clients.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a client type is registered
    pub fn has_client(&self, name: &str) -> bool {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        clients.contains_key(name)
    }
}
