// # Device Client Implementations
//
// Implementations of the DeviceClient trait that live in the core crate.
// Network-backed clients live in their own crates.

pub mod memory;

pub use memory::{MemoryDeviceClient, MemoryDeviceClientFactory};
