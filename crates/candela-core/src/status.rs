// ── Derived link status ──
//
// What a connection badge shows, computed from registry health plus the
// active device. Collaborators render this; they never re-derive it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Device;
use crate::store::RegistryStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LinkStatus {
    /// First fetch hasn't completed.
    Connecting,
    /// The last registry fetch failed.
    BackendUnreachable { error: String },
    /// Backend reachable but the active device is offline, or there is
    /// no active device at all.
    Disconnected { id: Option<String> },
    Connected {
        id: String,
        last_seen: DateTime<Utc>,
    },
}

impl LinkStatus {
    pub fn derive(registry: &RegistryStatus, active: Option<&Device>) -> Self {
        if let Some(error) = &registry.error {
            return Self::BackendUnreachable {
                error: error.clone(),
            };
        }
        if registry.loading {
            return Self::Connecting;
        }
        match active {
            Some(d) if d.connected => Self::Connected {
                id: d.id.clone(),
                last_seen: d.last_seen,
            },
            Some(d) => Self::Disconnected {
                id: Some(d.id.clone()),
            },
            None => Self::Disconnected { id: None },
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => f.write_str("Connecting..."),
            Self::BackendUnreachable { error } => write!(f, "Backend unreachable ({error})"),
            Self::Disconnected { id: Some(id) } => write!(f, "Disconnected: {id}"),
            Self::Disconnected { id: None } => f.write_str("Disconnected: no candlestick"),
            Self::Connected { id, last_seen } => {
                write!(f, "Connected: {id} (last seen {})", last_seen.format("%H:%M:%S"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dev(id: &str, connected: bool) -> Device {
        Device {
            id: id.into(),
            connected,
            program: None,
            random: None,
            speed: None,
            direction: None,
            color: None,
            last_seen: "2025-10-16T10:30:00Z".parse().unwrap(),
        }
    }

    fn ready() -> RegistryStatus {
        RegistryStatus {
            loading: false,
            error: None,
            last_refresh: None,
        }
    }

    #[test]
    fn loading_is_connecting() {
        assert_eq!(
            LinkStatus::derive(&RegistryStatus::default(), None),
            LinkStatus::Connecting
        );
    }

    #[test]
    fn fetch_error_wins_over_stale_device() {
        let status = RegistryStatus {
            error: Some("timed out".into()),
            ..ready()
        };
        let d = dev("a", true);
        assert!(matches!(
            LinkStatus::derive(&status, Some(&d)),
            LinkStatus::BackendUnreachable { .. }
        ));
    }

    #[test]
    fn offline_active_device_is_disconnected() {
        let d = dev("a", false);
        assert_eq!(
            LinkStatus::derive(&ready(), Some(&d)),
            LinkStatus::Disconnected {
                id: Some("a".into())
            }
        );
        assert_eq!(
            LinkStatus::derive(&ready(), None).to_string(),
            "Disconnected: no candlestick"
        );
    }

    #[test]
    fn online_active_device_is_connected() {
        let d = dev("a", true);
        let status = LinkStatus::derive(&ready(), Some(&d));
        assert!(status.is_connected());
        assert_eq!(status.to_string(), "Connected: a (last seen 10:30:00)");
    }
}
