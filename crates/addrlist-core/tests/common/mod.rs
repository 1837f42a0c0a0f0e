//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles wrap the in-memory device so tests can assert both on what
//! the device ends up holding and on which calls the reconciler made.

#![allow(dead_code)]

use addrlist_core::device::MemoryDeviceClient;
use addrlist_core::error::{Error, Result};
use addrlist_core::traits::DeviceClient;
use addrlist_core::wire::{AddressListResource, WireAttributes};
use addrlist_core::{Reconciler, ReconcilerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A device client that records every call it forwards to a memory device
#[derive(Clone, Default)]
pub struct RecordingDeviceClient {
    device: MemoryDeviceClient,
    exists_calls: Arc<AtomicUsize>,
    load_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    modify_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    /// Attribute payloads of create and modify calls, in order
    payloads: Arc<Mutex<Vec<WireAttributes>>>,
}

impl RecordingDeviceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the underlying device with a resource in wire shape
    pub async fn seed(&self, resource: serde_json::Value) {
        self.device.insert(resource).await.unwrap();
    }

    /// The underlying memory device
    pub fn device(&self) -> &MemoryDeviceClient {
        &self.device
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn modify_calls(&self) -> usize {
        self.modify_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of calls that change the device
    pub fn mutating_calls(&self) -> usize {
        self.create_calls() + self.modify_calls() + self.delete_calls()
    }

    /// Total number of calls of any kind
    pub fn total_calls(&self) -> usize {
        self.exists_calls() + self.load_calls() + self.mutating_calls()
    }

    /// Payloads sent with create and modify
    pub fn payloads(&self) -> Vec<WireAttributes> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DeviceClient for RecordingDeviceClient {
    async fn exists(&self, name: &str, partition: &str) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.device.exists(name, partition).await
    }

    async fn load(&self, name: &str, partition: &str) -> Result<AddressListResource> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.device.load(name, partition).await
    }

    async fn create(&self, name: &str, partition: &str, attributes: &WireAttributes) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(attributes.clone());
        self.device.create(name, partition, attributes).await
    }

    async fn modify(
        &self,
        resource: &AddressListResource,
        attributes: &WireAttributes,
    ) -> Result<()> {
        self.modify_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(attributes.clone());
        self.device.modify(resource, attributes).await
    }

    async fn delete(&self, resource: &AddressListResource) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.device.delete(resource).await
    }

    fn client_name(&self) -> &'static str {
        "recording"
    }
}

/// A device client whose deletes report success but never take effect
pub struct StickyDeviceClient {
    inner: MemoryDeviceClient,
}

impl StickyDeviceClient {
    pub fn new(inner: MemoryDeviceClient) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl DeviceClient for StickyDeviceClient {
    async fn exists(&self, name: &str, partition: &str) -> Result<bool> {
        self.inner.exists(name, partition).await
    }

    async fn load(&self, name: &str, partition: &str) -> Result<AddressListResource> {
        self.inner.load(name, partition).await
    }

    async fn create(&self, name: &str, partition: &str, attributes: &WireAttributes) -> Result<()> {
        self.inner.create(name, partition, attributes).await
    }

    async fn modify(
        &self,
        resource: &AddressListResource,
        attributes: &WireAttributes,
    ) -> Result<()> {
        self.inner.modify(resource, attributes).await
    }

    async fn delete(&self, _resource: &AddressListResource) -> Result<()> {
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "sticky"
    }
}

/// A device client where every call fails at the transport
pub struct UnreachableDeviceClient;

#[async_trait::async_trait]
impl DeviceClient for UnreachableDeviceClient {
    async fn exists(&self, _name: &str, _partition: &str) -> Result<bool> {
        Err(Error::http("connection refused"))
    }

    async fn load(&self, _name: &str, _partition: &str) -> Result<AddressListResource> {
        Err(Error::http("connection refused"))
    }

    async fn create(&self, _name: &str, _partition: &str, _attributes: &WireAttributes) -> Result<()> {
        Err(Error::http("connection refused"))
    }

    async fn modify(
        &self,
        _resource: &AddressListResource,
        _attributes: &WireAttributes,
    ) -> Result<()> {
        Err(Error::http("connection refused"))
    }

    async fn delete(&self, _resource: &AddressListResource) -> Result<()> {
        Err(Error::http("connection refused"))
    }

    fn client_name(&self) -> &'static str {
        "unreachable"
    }
}

/// Build a reconciler over `client`
pub fn reconciler_for(client: impl DeviceClient + 'static, dry_run: bool) -> Reconciler {
    let config = ReconcilerConfig {
        dry_run,
        ..ReconcilerConfig::default()
    };
    let (reconciler, _events) =
        Reconciler::new(Box::new(client), config).expect("reconciler construction succeeds");
    reconciler
}
