// ── Core error types ──
//
// User-facing errors from candela-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly: registry fetches,
// device lookups, and command dispatch each translate `candela_api::Error`
// into the variant that matches what the caller was doing.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Registry ─────────────────────────────────────────────────────
    /// Listing devices failed (transport, non-2xx, timeout, or a payload
    /// that violates the device schema). The previous list is retained.
    #[error("Failed to fetch candlestick registry: {message}")]
    RegistryFetch {
        message: String,
        #[source]
        source: Option<Box<candela_api::Error>>,
    },

    // ── Devices ──────────────────────────────────────────────────────
    /// The backend answered 404 for a device lookup or command: the
    /// device is unknown or not connected.
    #[error("Candlestick '{identifier}' is not connected")]
    DeviceNotFound { identifier: String },

    /// No device is currently selected, so there is nowhere to send.
    #[error("No active candlestick selected")]
    NoActiveDevice,

    // ── Commands ─────────────────────────────────────────────────────
    /// Any non-404 failure while sending a command.
    #[error("Failed to send command to '{device_id}': {message}")]
    CommandDispatch {
        device_id: String,
        message: String,
        #[source]
        source: Option<Box<candela_api::Error>>,
    },

    /// A command with no fields populated. Caller error; never sent.
    #[error("Command has no fields set")]
    EmptyCommand,

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported in {mode} mode: {operation}")]
    Unsupported { operation: String, mode: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the backend answered).
        status: Option<u16>,
        #[source]
        source: Option<Box<candela_api::Error>>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Wrap a failed registry listing.
    pub fn registry_fetch(err: candela_api::Error) -> Self {
        Self::RegistryFetch {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// A registry payload that doesn't fit the device schema.
    pub fn malformed_registry(err: &CoreError) -> Self {
        Self::RegistryFetch {
            message: err.to_string(),
            source: None,
        }
    }

    /// Wrap a failed command, separating "not connected" from the rest.
    pub fn dispatch(device_id: &str, err: candela_api::Error) -> Self {
        if err.is_not_found() {
            Self::DeviceNotFound {
                identifier: device_id.to_owned(),
            }
        } else {
            Self::CommandDispatch {
                device_id: device_id.to_owned(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }

    /// Wrap a failed single-device lookup.
    pub fn lookup(device_id: &str, err: candela_api::Error) -> Self {
        if err.is_not_found() {
            Self::DeviceNotFound {
                identifier: device_id.to_owned(),
            }
        } else {
            Self::from(err)
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for "device not connected" outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound { .. })
    }

    /// The transport-level failure underneath, if there was one.
    pub fn api_source(&self) -> Option<&candela_api::Error> {
        match self {
            Self::RegistryFetch { source, .. }
            | Self::CommandDispatch { source, .. }
            | Self::Api { source, .. } => source.as_deref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.api_source().is_some_and(candela_api::Error::is_timeout)
    }

    /// The backend could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        self.api_source().is_some_and(candela_api::Error::is_connect)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<candela_api::Error> for CoreError {
    fn from(err: candela_api::Error) -> Self {
        match err {
            candela_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            candela_api::Error::UnsupportedBaseUrl(url) => CoreError::Config {
                message: format!("Backend URL cannot carry API paths: {url}"),
            },
            candela_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            other => CoreError::Api {
                status: other.status(),
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_404_is_device_not_found() {
        let api = candela_api::Error::NotFound {
            path: "/api/candlesticks/b/command".into(),
            detail: "Candlestick 'b' is not connected".into(),
        };
        let err = CoreError::dispatch("b", api);
        assert!(matches!(err, CoreError::DeviceNotFound { ref identifier } if identifier == "b"));
        assert_eq!(err.to_string(), "Candlestick 'b' is not connected");
    }

    #[test]
    fn dispatch_other_failures_keep_underlying_message() {
        let api = candela_api::Error::Http {
            status: 500,
            message: "controller offline".into(),
        };
        let err = CoreError::dispatch("b", api);
        match err {
            CoreError::CommandDispatch {
                device_id, message, ..
            } => {
                assert_eq!(device_id, "b");
                assert!(message.contains("controller offline"));
            }
            other => panic!("expected CommandDispatch, got {other:?}"),
        }
    }

    #[test]
    fn timeouts_are_dispatch_errors_not_not_found() {
        let api = candela_api::Error::Timeout {
            timeout: std::time::Duration::from_secs(5),
        };
        let err = CoreError::dispatch("a", api);
        assert!(matches!(err, CoreError::CommandDispatch { .. }));
        assert!(err.is_timeout());
        assert!(!err.is_unreachable());
    }
}
