// Shared transport configuration for building reqwest::Client instances.
//
// The registry client and the legacy client share TLS and timeout
// settings through this module. Every request carries an explicit
// timeout; there is no "wait forever" mode.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("candela/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode (api-level mirror of core's `TlsVerification`).
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed backends on a LAN).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .user_agent(USER_AGENT);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Turn a `reqwest` error into an API error, surfacing timeouts as
/// [`Error::Timeout`] so callers don't have to dig into the source.
pub(crate) fn classify(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout { timeout }
    } else {
        Error::Transport(err)
    }
}

/// Append path segments to a base URL, keeping any prefix the base
/// already carries (e.g. `http://host/lights` + `api/health`).
pub(crate) fn join_segments(base: &url::Url, segments: &[&str]) -> Result<url::Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::UnsupportedBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_base_prefix() {
        let base = url::Url::parse("http://host:8000/lights/").unwrap();
        let url = join_segments(&base, &["api", "candlesticks"]).unwrap();
        assert_eq!(url.as_str(), "http://host:8000/lights/api/candlesticks");
    }

    #[test]
    fn join_escapes_device_ids() {
        let base = url::Url::parse("http://host:8000").unwrap();
        let url = join_segments(&base, &["api", "candlesticks", "hall/left", "command"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://host:8000/api/candlesticks/hall%2Fleft/command"
        );
    }

    #[test]
    fn default_timeout_is_explicit() {
        assert_eq!(TransportConfig::default().timeout, DEFAULT_TIMEOUT);
    }
}
