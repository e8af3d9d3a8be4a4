// ── Full-list registry ──
//
// Every successful fetch replaces the whole list: devices that vanished
// from the backend are dropped, never merged. A failed fetch only flips
// the error flag so the UI keeps showing the last good list.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::warn;

use crate::error::CoreError;
use crate::model::Device;

/// Health of the registry as seen by collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStatus {
    /// No fetch has completed yet (successfully or not).
    pub loading: bool,
    /// Message of the most recent failed fetch; cleared on success.
    pub error: Option<String>,
    /// When the list was last replaced.
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Default for RegistryStatus {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            last_refresh: None,
        }
    }
}

impl RegistryStatus {
    pub fn is_healthy(&self) -> bool {
        !self.loading && self.error.is_none()
    }
}

#[derive(Debug)]
pub struct DeviceRegistry {
    devices: watch::Sender<Arc<Vec<Device>>>,
    status: watch::Sender<RegistryStatus>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        let (devices, _) = watch::channel(Arc::new(Vec::new()));
        let (status, _) = watch::channel(RegistryStatus::default());
        Self { devices, status }
    }

    /// Replace the entire list and clear the error flag.
    ///
    /// Returns the new snapshot so the caller can reconcile against
    /// exactly what was applied.
    pub fn apply(&self, devices: Vec<Device>) -> Arc<Vec<Device>> {
        {
            let previous = self.devices.borrow();
            for device in &devices {
                if let Some(old) = previous.iter().find(|d| d.id == device.id) {
                    if device.last_seen < old.last_seen {
                        warn!(
                            id = %device.id,
                            previous = %old.last_seen,
                            reported = %device.last_seen,
                            "last_seen went backwards; keeping backend value"
                        );
                    }
                }
            }
        }

        let snapshot = Arc::new(devices);
        self.devices.send_replace(Arc::clone(&snapshot));
        self.status.send_modify(|s| {
            s.loading = false;
            s.error = None;
            s.last_refresh = Some(Utc::now());
        });
        snapshot
    }

    /// Record a failed fetch. The current list is left untouched.
    pub fn mark_failed(&self, err: &CoreError) {
        let message = err.to_string();
        self.status.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
        });
    }

    /// Current list (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Device>> {
        Arc::clone(&self.devices.borrow())
    }

    pub fn get(&self, id: &str) -> Option<Device> {
        self.devices.borrow().iter().find(|d| d.id == id).cloned()
    }

    pub fn status(&self) -> RegistryStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Device>>> {
        self.devices.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<RegistryStatus> {
        self.status.subscribe()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dev(id: &str) -> Device {
        Device {
            id: id.into(),
            connected: true,
            program: None,
            random: None,
            speed: None,
            direction: None,
            color: None,
            last_seen: "2025-10-16T10:30:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn starts_loading_and_empty() {
        let registry = DeviceRegistry::new();
        assert!(registry.snapshot().is_empty());
        assert!(registry.status().loading);
        assert!(!registry.status().is_healthy());
    }

    #[test]
    fn apply_replaces_whole_list() {
        let registry = DeviceRegistry::new();
        registry.apply(vec![dev("a"), dev("b")]);
        registry.apply(vec![dev("c")]);

        let ids: Vec<_> = registry.snapshot().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["c"]);
        assert!(registry.get("a").is_none());
    }

    #[test]
    fn failure_retains_list_and_success_clears_flag() {
        let registry = DeviceRegistry::new();
        registry.apply(vec![dev("a")]);

        registry.mark_failed(&CoreError::RegistryFetch {
            message: "connection refused".into(),
            source: None,
        });
        let status = registry.status();
        assert!(!status.loading);
        assert!(status.error.as_deref().unwrap().contains("connection refused"));
        assert_eq!(registry.snapshot().len(), 1);

        registry.apply(vec![dev("a")]);
        assert!(registry.status().is_healthy());
        assert!(registry.status().last_refresh.is_some());
    }
}
