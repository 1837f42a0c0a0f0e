//! Address-list reconciler
//!
//! The Reconciler is responsible for:
//! - Canonicalizing the desired state before touching the device
//! - Checking whether the list exists
//! - Creating, updating or deleting it through the DeviceClient
//! - Reporting which fields changed
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ AddressListParams│─── canonicalize ───┐
//! └──────────────────┘                    │
//!                                         ▼
//!                                ┌──────────────┐
//!                                │  Reconciler  │
//!                                └──────────────┘
//!                                         │
//!         ┌───────────────────────────────┼───────────────────────────┐
//!         │                               │                           │
//!         ▼                               ▼                           ▼
//! ┌──────────────┐               ┌──────────────┐            ┌─────────────┐
//! │ DeviceClient │               │  Difference  │            │   Events    │
//! │ (read/write) │               │  (changes)   │            │  (notify)   │
//! └──────────────┘               └──────────────┘            └─────────────┘
//! ```
//!
//! ## State Machine
//!
//! | desired   | on device | action                                      |
//! |-----------|-----------|---------------------------------------------|
//! | `present` | missing   | create with every non-empty desired field   |
//! | `present` | exists    | load, diff, modify only the changed fields  |
//! | `absent`  | exists    | delete, then verify it is gone              |
//! | `absent`  | missing   | nothing                                     |
//!
//! In dry-run the same decisions are made and reported, but no mutating
//! call reaches the device.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::canonical::DesiredList;
use crate::config::{AddressListParams, DesiredState, ReconcilerConfig};
use crate::diff::Difference;
use crate::error::{Error, Result};
use crate::fields::FieldSet;
use crate::report::Report;
use crate::snapshot::AddressListState;
use crate::traits::DeviceClient;
use crate::wire::build_attributes;

/// What the reconciler did (or would do, in dry-run)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted by the Reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileEvent {
    /// Reconciliation of a list started
    Started {
        path: String,
        state: DesiredState,
    },

    /// Fields found to differ from the device
    ChangesDetected {
        path: String,
        fields: Vec<&'static str>,
    },

    /// A mutating call succeeded
    Applied {
        path: String,
        action: Action,
    },

    /// A mutating call was skipped because of dry-run
    DryRun {
        path: String,
        action: Action,
    },

    /// The device already matches the desired state
    Unchanged {
        path: String,
    },

    /// Reconciliation failed
    Failed {
        path: String,
        error: String,
    },
}

/// Reconciles one address list at a time against a device
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`]
/// 2. Call [`Reconciler::reconcile()`] once per desired list
/// 3. Drain the event receiver if interested
///
/// Device calls are issued one after another; nothing runs concurrently and
/// nothing is retried.
pub struct Reconciler {
    /// Device API client
    client: Box<dyn DeviceClient>,

    /// Stop before any mutating call
    dry_run: bool,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<ReconcileEvent>,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Returns
    ///
    /// A tuple of (reconciler, event_receiver) where event_receiver yields
    /// reconciler events
    pub fn new(
        client: Box<dyn DeviceClient>,
        config: ReconcilerConfig,
    ) -> Result<(Self, mpsc::Receiver<ReconcileEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let reconciler = Self {
            client,
            dry_run: config.dry_run,
            event_tx: tx,
        };

        Ok((reconciler, rx))
    }

    /// Whether mutating calls are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Canonicalize `params` and bring the device in line with them
    ///
    /// Validation failures abort before any device call.
    pub async fn reconcile(&self, params: &AddressListParams) -> Result<Report> {
        let desired = DesiredList::canonicalize(params)?;
        self.apply(&desired, params.state).await
    }

    /// Bring the device in line with an already canonical desired list
    pub async fn apply(&self, desired: &DesiredList, state: DesiredState) -> Result<Report> {
        let path = desired.full_path();
        debug!("Reconciling {} (state: {:?}, dry_run: {})", path, state, self.dry_run);
        self.emit_event(ReconcileEvent::Started {
            path: path.clone(),
            state,
        });

        let result = match state {
            DesiredState::Present => self.present(desired).await,
            DesiredState::Absent => self.absent(desired).await,
        };

        if let Err(e) = &result {
            self.emit_event(ReconcileEvent::Failed {
                path,
                error: e.to_string(),
            });
        }
        result
    }

    async fn present(&self, desired: &DesiredList) -> Result<Report> {
        if self.exists(desired).await? {
            self.update(desired).await
        } else {
            self.create(desired).await
        }
    }

    async fn absent(&self, desired: &DesiredList) -> Result<Report> {
        if self.exists(desired).await? {
            self.remove(desired).await
        } else {
            debug!("{} does not exist, nothing to remove", desired.full_path());
            self.emit_event(ReconcileEvent::Unchanged {
                path: desired.full_path(),
            });
            Ok(Report::unchanged())
        }
    }

    async fn exists(&self, desired: &DesiredList) -> Result<bool> {
        self.client
            .exists(&desired.name, &desired.partition)
            .await
            .map_err(|e| self.device_error("check", desired, e))
    }

    async fn create(&self, desired: &DesiredList) -> Result<Report> {
        let have = FieldSet::default();
        let changes = Difference::new(&desired.fields, &have)
            .change_set()
            .without_empty();
        self.emit_event(ReconcileEvent::ChangesDetected {
            path: desired.full_path(),
            fields: changes.field_names(),
        });

        if self.skip_for_dry_run(desired, Action::Create) {
            return Ok(Report::changed(&changes));
        }

        let attributes = build_attributes(&changes, &desired.fields, &have)?;
        self.client
            .create(&desired.name, &desired.partition, &attributes)
            .await
            .map_err(|e| self.device_error("create", desired, e))?;

        info!("Created {} ({:?})", desired.full_path(), changes.field_names());
        self.emit_event(ReconcileEvent::Applied {
            path: desired.full_path(),
            action: Action::Create,
        });
        Ok(Report::changed(&changes))
    }

    async fn update(&self, desired: &DesiredList) -> Result<Report> {
        let resource = self
            .client
            .load(&desired.name, &desired.partition)
            .await
            .map_err(|e| self.device_error("load", desired, e))?;
        let live = AddressListState::from_resource(&resource)?;

        let changes = Difference::new(&desired.fields, &live.fields).change_set();
        if changes.is_empty() {
            debug!("{} is up to date", desired.full_path());
            self.emit_event(ReconcileEvent::Unchanged {
                path: desired.full_path(),
            });
            return Ok(Report::unchanged());
        }

        self.emit_event(ReconcileEvent::ChangesDetected {
            path: desired.full_path(),
            fields: changes.field_names(),
        });

        if self.skip_for_dry_run(desired, Action::Update) {
            return Ok(Report::changed(&changes));
        }

        let attributes = build_attributes(&changes, &desired.fields, &live.fields)?;
        self.client
            .modify(&resource, &attributes)
            .await
            .map_err(|e| self.device_error("modify", desired, e))?;

        info!("Updated {} ({:?})", desired.full_path(), changes.field_names());
        self.emit_event(ReconcileEvent::Applied {
            path: desired.full_path(),
            action: Action::Update,
        });
        Ok(Report::changed(&changes))
    }

    async fn remove(&self, desired: &DesiredList) -> Result<Report> {
        if self.skip_for_dry_run(desired, Action::Delete) {
            return Ok(Report {
                changed: true,
                ..Report::default()
            });
        }

        let resource = self
            .client
            .load(&desired.name, &desired.partition)
            .await
            .map_err(|e| self.device_error("load", desired, e))?;
        self.client
            .delete(&resource)
            .await
            .map_err(|e| self.device_error("delete", desired, e))?;

        if self.exists(desired).await? {
            return Err(Error::deletion_failed(&desired.name, &desired.partition));
        }

        info!("Deleted {}", desired.full_path());
        self.emit_event(ReconcileEvent::Applied {
            path: desired.full_path(),
            action: Action::Delete,
        });
        Ok(Report {
            changed: true,
            ..Report::default()
        })
    }

    /// Log and emit the skipped action; true when the caller must stop
    fn skip_for_dry_run(&self, desired: &DesiredList, action: Action) -> bool {
        if !self.dry_run {
            return false;
        }
        info!("Dry run: would {} {}", action, desired.full_path());
        self.emit_event(ReconcileEvent::DryRun {
            path: desired.full_path(),
            action,
        });
        true
    }

    /// Wrap a client failure with what was being attempted
    fn device_error(&self, action: &str, desired: &DesiredList, err: Error) -> Error {
        Error::device(
            self.client.client_name(),
            format!("Failed to {} {}: {}", action, desired.full_path(), err),
        )
    }

    /// Emit a reconciler event
    fn emit_event(&self, event: ReconcileEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            // Nobody is listening
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}
