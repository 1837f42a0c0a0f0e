// # Memory Device Client
//
// In-memory implementation of DeviceClient.
//
// ## Purpose
//
// Behaves like a device holding address lists in memory: resources are
// stored in their wire shape, `modify` merges attributes the way a partial
// update does, and unknown attributes are rejected. Useful for testing,
// embedding and rehearsing a change without a device.
//
// ## Limitations
//
// - State is lost when the client is dropped
// - Nested list references are not checked for existence

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::Error;
use crate::config::ClientConfig;
use crate::fields::Field;
use crate::traits::{DeviceClient, DeviceClientFactory};
use crate::wire::{AddressListResource, WireAttributes};

/// In-memory device client
///
/// Resources are keyed by `/partition/name`. Clones share the same store, so
/// a test can keep a handle and inspect what the reconciler wrote.
///
/// # Example
///
/// ```rust,no_run
/// use addrlist_core::device::MemoryDeviceClient;
/// use addrlist_core::traits::DeviceClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let device = MemoryDeviceClient::new();
///
///     device.create("blocklist", "Common", &Default::default()).await?;
///     assert!(device.exists("blocklist", "Common").await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDeviceClient {
    inner: Arc<RwLock<BTreeMap<String, WireAttributes>>>,
}

fn key(name: &str, partition: &str) -> String {
    format!("/{}/{}", partition, name)
}

fn check_attributes(attributes: &WireAttributes) -> Result<(), Error> {
    match attributes
        .keys()
        .find(|k| Field::from_wire_name(k).is_none())
    {
        Some(unknown) => Err(Error::device(
            "memory",
            format!("Unknown address-list attribute '{}'", unknown),
        )),
        None => Ok(()),
    }
}

impl MemoryDeviceClient {
    /// Create a new empty device
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the device with a resource in wire shape
    ///
    /// `resource` must carry `name` and `partition`.
    pub async fn insert(&self, resource: Value) -> Result<(), Error> {
        let (path, stored) = seed_entry(resource)?;
        self.inner.write().await.insert(path, stored);
        Ok(())
    }

    /// Current wire representation of `/partition/name`
    pub async fn get(&self, name: &str, partition: &str) -> Option<Value> {
        self.inner
            .read()
            .await
            .get(&key(name, partition))
            .cloned()
            .map(Value::Object)
    }

    /// Get the number of resources on the device
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the device holds no resources
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl DeviceClient for MemoryDeviceClient {
    async fn exists(&self, name: &str, partition: &str) -> Result<bool, Error> {
        Ok(self.inner.read().await.contains_key(&key(name, partition)))
    }

    async fn load(&self, name: &str, partition: &str) -> Result<AddressListResource, Error> {
        let path = key(name, partition);
        let stored = self
            .inner
            .read()
            .await
            .get(&path)
            .cloned()
            .ok_or_else(|| Error::not_found(path))?;
        AddressListResource::from_json(Value::Object(stored))
    }

    async fn create(
        &self,
        name: &str,
        partition: &str,
        attributes: &WireAttributes,
    ) -> Result<(), Error> {
        check_attributes(attributes)?;

        let path = key(name, partition);
        let mut guard = self.inner.write().await;
        if guard.contains_key(&path) {
            return Err(Error::device(
                "memory",
                format!("Resource {} already exists", path),
            ));
        }

        guard.insert(path, with_identity(attributes.clone(), name, partition));
        Ok(())
    }

    async fn modify(
        &self,
        resource: &AddressListResource,
        attributes: &WireAttributes,
    ) -> Result<(), Error> {
        check_attributes(attributes)?;

        let path = resource.full_path();
        let mut guard = self.inner.write().await;
        let stored = guard
            .get_mut(&path)
            .ok_or_else(|| Error::not_found(path.clone()))?;
        for (k, v) in attributes {
            stored.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    async fn delete(&self, resource: &AddressListResource) -> Result<(), Error> {
        let path = resource.full_path();
        self.inner
            .write()
            .await
            .remove(&path)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(path))
    }

    fn client_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for in-memory devices
///
/// Accepts `ClientConfig::Custom { factory: "memory", config }` where
/// `config` may hold a `resources` array to seed the device with.
pub struct MemoryDeviceClientFactory;

impl DeviceClientFactory for MemoryDeviceClientFactory {
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn DeviceClient>, Error> {
        let ClientConfig::Custom { config, .. } = config else {
            return Err(Error::config("Invalid config for memory client"));
        };

        let mut store = BTreeMap::new();
        if let Some(resources) = config.get("resources").and_then(Value::as_array) {
            for value in resources {
                let (path, stored) = seed_entry(value.clone())?;
                store.insert(path, stored);
            }
        }

        Ok(Box::new(MemoryDeviceClient {
            inner: Arc::new(RwLock::new(store)),
        }))
    }
}

/// Stored form of a resource: its attributes plus `name` and `partition`
fn with_identity(mut attributes: WireAttributes, name: &str, partition: &str) -> WireAttributes {
    attributes.insert("name".to_string(), Value::String(name.to_string()));
    attributes.insert("partition".to_string(), Value::String(partition.to_string()));
    attributes
}

fn seed_entry(resource: Value) -> Result<(String, WireAttributes), Error> {
    let parsed = AddressListResource::from_json(resource)?;
    let path = key(&parsed.name, &parsed.partition);
    Ok((path, with_identity(parsed.attributes, &parsed.name, &parsed.partition)))
}
