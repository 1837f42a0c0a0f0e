// # addrlist-core
//
// Core library for reconciling firewall address lists on a network appliance.
//
// ## Architecture Overview
//
// This library provides the reconciliation core:
// - **Canonicalizer**: Validates and normalizes desired-state input
// - **AddressListState**: Canonical snapshot of what the device holds
// - **Difference**: Per-field comparison producing a ChangeSet
// - **Reconciler**: Drives exists → create/update/delete → verify
// - **DeviceClient**: Trait for the device's management API
// - **ClientRegistry**: Plugin-based registry for device clients
//
// ## Design Principles
//
// 1. **Validate first**: Nothing reaches the device until input is canonical
// 2. **Minimal updates**: Only fields that differ are sent
// 3. **Plugin-Based**: Clients are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library

pub mod canonical;
pub mod config;
pub mod device;
pub mod diff;
pub mod error;
pub mod fields;
pub mod reconciler;
pub mod registry;
pub mod report;
pub mod snapshot;
pub mod traits;
pub mod wire;

// Re-export core types for convenience
pub use canonical::DesiredList;
pub use config::{AddressListParams, ClientConfig, DesiredState, GeoLocationParam, ReconcilerConfig};
pub use device::MemoryDeviceClient;
pub use diff::{ChangeSet, Difference};
pub use error::{Error, Result, ValidationError};
pub use fields::{Field, FieldSet, FieldValue};
pub use reconciler::{Action, ReconcileEvent, Reconciler};
pub use registry::ClientRegistry;
pub use report::{Report, ReportableChangeSet};
pub use snapshot::AddressListState;
pub use traits::{DeviceClient, DeviceClientFactory};
pub use wire::{AddressListResource, WireAttributes};
