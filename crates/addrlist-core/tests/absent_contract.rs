//! Contract Test: Removing Address Lists
//!
//! Constraints verified:
//! - Removing a missing list makes no mutation and reports no change
//! - Removing an existing list deletes it and verifies it is gone
//! - A list that survives deletion is a hard failure
//! - Device failures abort with context

mod common;

use addrlist_core::{AddressListParams, DesiredState, Error};
use common::*;
use serde_json::json;

fn absent(name: &str) -> AddressListParams {
    AddressListParams::new(name).with_state(DesiredState::Absent)
}

#[tokio::test]
async fn absent_on_missing_list_is_a_noop() {
    let client = RecordingDeviceClient::new();
    let reconciler = reconciler_for(client.clone(), false);

    let report = reconciler.reconcile(&absent("foo")).await.unwrap();

    assert!(!report.changed);
    assert_eq!(client.exists_calls(), 1);
    assert_eq!(client.mutating_calls(), 0);
}

#[tokio::test]
async fn absent_deletes_and_verifies() {
    let client = RecordingDeviceClient::new();
    client
        .seed(json!({"name": "foo", "partition": "Common", "fqdns": [{"name": "a.com"}]}))
        .await;
    let reconciler = reconciler_for(client.clone(), false);

    let report = reconciler.reconcile(&absent("foo")).await.unwrap();

    assert!(report.changed);
    assert!(report.changes.is_empty());
    assert_eq!(client.delete_calls(), 1);
    // Once before deciding, once after deleting
    assert_eq!(client.exists_calls(), 2);
    assert!(client.device().is_empty().await);
}

#[tokio::test]
async fn surviving_list_fails_deletion() {
    let device = addrlist_core::MemoryDeviceClient::new();
    device
        .insert(json!({"name": "foo", "partition": "Tenant"}))
        .await
        .unwrap();
    let reconciler = reconciler_for(StickyDeviceClient::new(device), false);

    let err = reconciler
        .reconcile(&absent("foo").with_partition("Tenant"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DeletionFailed { .. }));
    assert_eq!(err.to_string(), "Failed to delete the resource /Tenant/foo");
}

#[tokio::test]
async fn transport_failure_is_wrapped_with_context() {
    let reconciler = reconciler_for(UnreachableDeviceClient, false);

    let err = reconciler.reconcile(&absent("foo")).await.unwrap_err();

    assert!(!err.is_validation());
    match err {
        Error::Device { client, message } => {
            assert_eq!(client, "unreachable");
            assert!(message.contains("/Common/foo"));
            assert!(message.contains("connection refused"));
        }
        other => panic!("unexpected error: {}", other),
    }
}
