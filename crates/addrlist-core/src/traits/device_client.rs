// # Device Client Trait
//
// Defines the narrow interface the reconciler uses to talk to the device's
// management API.
//
// ## Implementations
//
// - BIG-IP iControl REST: `addrlist-client-bigip` crate
// - In-memory device: [`crate::device::MemoryDeviceClient`]
//
// ## Usage
//
// ```rust,ignore
// use addrlist_core::DeviceClient;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = /* DeviceClient implementation */;
//
//     if client.exists("blocklist", "Common").await? {
//         let resource = client.load("blocklist", "Common").await?;
//         client.delete(&resource).await?;
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::wire::{AddressListResource, WireAttributes};

/// Trait for device API client implementations
///
/// # Responsibilities
///
/// Clients translate each call into exactly one request against the device
/// and report the outcome. They do not decide whether a change is needed,
/// do not retry and do not cache: every call reflects the device as it is.
///
/// Attribute maps passed to [`create`](DeviceClient::create) and
/// [`modify`](DeviceClient::modify) are already keyed by wire name and hold
/// only the attributes that should be written.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Whether `/partition/name` exists on the device
    async fn exists(&self, name: &str, partition: &str) -> Result<bool, crate::Error>;

    /// Read `/partition/name`
    ///
    /// # Returns
    ///
    /// - `Ok(AddressListResource)`: The resource as the device reports it
    /// - `Err(Error::NotFound)`: If the resource does not exist
    async fn load(&self, name: &str, partition: &str)
    -> Result<AddressListResource, crate::Error>;

    /// Create `/partition/name` with the given attributes
    async fn create(
        &self,
        name: &str,
        partition: &str,
        attributes: &WireAttributes,
    ) -> Result<(), crate::Error>;

    /// Partially update a loaded resource
    ///
    /// Attributes not present in `attributes` are left untouched.
    async fn modify(
        &self,
        resource: &AddressListResource,
        attributes: &WireAttributes,
    ) -> Result<(), crate::Error>;

    /// Delete a loaded resource
    async fn delete(&self, resource: &AddressListResource) -> Result<(), crate::Error>;

    /// Get the client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

/// Helper trait for constructing device clients from configuration
pub trait DeviceClientFactory: Send + Sync {
    /// Create a DeviceClient instance from configuration
    fn create(
        &self,
        config: &crate::config::ClientConfig,
    ) -> Result<Box<dyn DeviceClient>, crate::Error>;
}
