//! Core traits for the address-list reconciler
//!
//! - [`DeviceClient`]: Read and write address lists through the device API

pub mod device_client;

pub use device_client::{DeviceClient, DeviceClientFactory};
