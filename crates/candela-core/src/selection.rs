// ── Active-device selection ──
//
// Holds the id of the device UI commands target. Re-evaluated on every
// registry update, but only a *disappearance* from the registry forces a
// change: a selected device going offline keeps its selection so a
// manual choice isn't overridden while the device reboots.

use tokio::sync::watch;
use tracing::info;

use crate::model::Device;

/// Owner of the active device id. Shared by `Arc` between the registry
/// poller (which reconciles it) and the command dispatcher (which reads
/// it at send time).
#[derive(Debug)]
pub struct SelectionManager {
    /// Empty string means "no active device".
    selected: watch::Sender<String>,
}

impl SelectionManager {
    pub fn new() -> Self {
        let (selected, _) = watch::channel(String::new());
        Self { selected }
    }

    /// Start with `id` already selected (legacy single-device mode).
    pub fn with_selected(id: impl Into<String>) -> Self {
        let (selected, _) = watch::channel(id.into());
        Self { selected }
    }

    /// Currently selected id, or `None` when nothing is selected.
    pub fn selected_id(&self) -> Option<String> {
        let id = self.selected.borrow();
        if id.is_empty() {
            None
        } else {
            Some(id.clone())
        }
    }

    /// Explicit override from the UI. No validation: the caller picks
    /// from ids it has seen, and the last value wins.
    pub fn set_selected(&self, id: impl Into<String>) {
        let id = id.into();
        self.selected.send_if_modified(|current| {
            if *current == id {
                false
            } else {
                info!(from = %current, to = %id, "candlestick selected");
                *current = id;
                true
            }
        });
    }

    /// Re-evaluate the selection against a fresh registry listing.
    ///
    /// Returns `true` if the selection changed. Applying the same list
    /// twice never changes anything the second time.
    pub fn reconcile(&self, devices: &[Device]) -> bool {
        self.selected.send_if_modified(|current| {
            if !current.is_empty() && devices.iter().any(|d| d.id == *current) {
                return false;
            }

            let next = auto_select(devices).map(|d| d.id.clone()).unwrap_or_default();
            if next == *current {
                return false;
            }

            info!(
                from = %current,
                to = %next,
                "active candlestick re-selected"
            );
            *current = next;
            true
        })
    }

    /// The device matching the current selection, if it is in `devices`.
    pub fn active_device(&self, devices: &[Device]) -> Option<Device> {
        let selected = self.selected.borrow();
        if selected.is_empty() {
            return None;
        }
        devices.iter().find(|d| d.id == *selected).cloned()
    }

    /// Subscribe to selection changes. The value is `""` when nothing is
    /// selected.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.selected.subscribe()
    }
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// First connected device in list order, else the first device at all.
pub fn auto_select(devices: &[Device]) -> Option<&Device> {
    devices
        .iter()
        .find(|d| d.connected)
        .or_else(|| devices.first())
}
