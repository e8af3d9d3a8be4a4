// ── Runtime engine configuration ──
//
// Describes which backend to talk to and how fast. Never touches disk:
// the CLI (via candela-config) builds a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::dispatch::DEFAULT_MIN_INTERVAL;
use crate::poller::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_DEVICE_ID: &str = "candlestick_001";

/// Which backend API the engine drives.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApiMode {
    /// Multi-device registry API, polled for the device list.
    #[default]
    Registry,
    /// Single fixed device via `POST /api` and `POST /api/color`.
    Legacy,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    #[default]
    SystemDefaults,
    CustomCa(PathBuf),
    /// Skip verification (self-signed backends on a LAN).
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Backend base URL (e.g. `http://localhost:8000`).
    pub url: Url,
    /// Target in legacy mode; the CLI's default `--device`.
    pub default_device_id: String,
    pub mode: ApiMode,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Minimum spacing between continuous-input sends.
    pub command_interval: Duration,
}

impl ControllerConfig {
    /// Config for `url` with every other setting at its default.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            default_device_id: DEFAULT_DEVICE_ID.into(),
            mode: ApiMode::default(),
            tls: TlsVerification::default(),
            timeout: candela_api::transport::DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            command_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}
