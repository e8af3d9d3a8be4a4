//! Configuration for candela tools.
//!
//! Built-in defaults, then a TOML file in the platform config dir, then
//! `CANDELA_*` environment variables. Command-line flags are layered on
//! top by the CLI; the result is then validated and turned into a
//! `candela_core::ControllerConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use candela_core::{ApiMode, ControllerConfig, TlsVerification};

/// Environment variable prefix (`CANDELA_BACKEND_URL`, ...).
pub const ENV_PREFIX: &str = "CANDELA_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL.
    pub backend_url: String,

    /// Legacy-mode target and the CLI's default `--device`.
    pub default_device_id: String,

    /// "registry" or "legacy".
    pub mode: String,

    pub poll_interval_ms: u64,

    /// Minimum spacing between continuous-input sends.
    pub command_interval_ms: u64,

    pub timeout_secs: u64,

    /// Default CLI output format: "table" or "json".
    pub output: String,

    /// Skip TLS verification (self-signed backends).
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".into(),
            default_device_id: candela_core::config::DEFAULT_DEVICE_ID.into(),
            mode: "registry".into(),
            poll_interval_ms: 3000,
            command_interval_ms: 100,
            timeout_secs: 5,
            output: "table".into(),
            insecure: false,
            ca_cert: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parse_url()?;
        self.parse_mode()?;
        if self.default_device_id.trim().is_empty() {
            return Err(ConfigError::invalid("default_device_id", "must not be empty"));
        }
        for (field, value) in [
            ("poll_interval_ms", self.poll_interval_ms),
            ("command_interval_ms", self.command_interval_ms),
            ("timeout_secs", self.timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be greater than zero"));
            }
        }
        if !matches!(self.output.as_str(), "table" | "json") {
            return Err(ConfigError::invalid(
                "output",
                format!("expected 'table' or 'json', got '{}'", self.output),
            ));
        }
        Ok(())
    }

    /// Validate and build the engine config.
    pub fn to_controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        self.validate()?;

        let tls = if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        let mut config = ControllerConfig::new(self.parse_url()?);
        config.default_device_id.clone_from(&self.default_device_id);
        config.mode = self.parse_mode()?;
        config.tls = tls;
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.poll_interval = Duration::from_millis(self.poll_interval_ms);
        config.command_interval = Duration::from_millis(self.command_interval_ms);
        Ok(config)
    }

    fn parse_url(&self) -> Result<url::Url, ConfigError> {
        let url: url::Url = self
            .backend_url
            .parse()
            .map_err(|e| ConfigError::invalid("backend_url", format!("{e}: {}", self.backend_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "backend_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    fn parse_mode(&self) -> Result<ApiMode, ConfigError> {
        self.mode.parse().map_err(|_| {
            ConfigError::invalid(
                "mode",
                format!("expected 'registry' or 'legacy', got '{}'", self.mode),
            )
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("se", "sandnabba", "candela").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("candela");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file is not an error.
///
/// Values are only type-checked here; call [`Config::validate`] once any
/// further overrides have been applied.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX));

    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize to TOML and write to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());

        let engine = cfg.to_controller_config().unwrap();
        assert_eq!(engine.url.as_str(), "http://localhost:8000/");
        assert_eq!(engine.default_device_id, "candlestick_001");
        assert_eq!(engine.mode, ApiMode::Registry);
        assert_eq!(engine.poll_interval, Duration::from_secs(3));
        assert_eq!(engine.command_interval, Duration::from_millis(100));
        assert_eq!(engine.timeout, Duration::from_secs(5));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
backend_url = "http://candles.lan:9000/prefix"
default_device_id = "hall"
mode = "legacy"
poll_interval_ms = 1500
"#,
        );

        let engine = load_config_from(&path).unwrap().to_controller_config().unwrap();
        assert_eq!(engine.url.as_str(), "http://candles.lan:9000/prefix");
        assert_eq!(engine.default_device_id, "hall");
        assert_eq!(engine.mode, ApiMode::Legacy);
        assert_eq!(engine.poll_interval, Duration::from_millis(1500));
        assert_eq!(engine.command_interval, Duration::from_millis(100));
    }

    #[test]
    fn invalid_values_are_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        for body in [
            "backend_url = \"not a url\"",
            "backend_url = \"ftp://example.com\"",
            "mode = \"mesh\"",
            "poll_interval_ms = 0",
            "command_interval_ms = 0",
            "output = \"yaml\"",
        ] {
            let path = write(&dir, body);
            let cfg = load_config_from(&path).unwrap();
            let err = cfg.validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { .. }),
                "{body} gave {err:?}"
            );
        }
    }

    #[test]
    fn invalid_file_value_can_be_overridden_before_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "backend_url = \"not a url\"");

        let mut cfg = load_config_from(&path).unwrap();
        assert!(cfg.to_controller_config().is_err());

        cfg.backend_url = "http://127.0.0.1:9".into();
        assert_eq!(
            cfg.to_controller_config().unwrap().url.as_str(),
            "http://127.0.0.1:9/"
        );
    }

    #[test]
    fn tls_options_map_to_verification_mode() {
        let mut cfg = Config {
            ca_cert: Some(PathBuf::from("/etc/candela/ca.pem")),
            ..Config::default()
        };
        assert_eq!(
            cfg.to_controller_config().unwrap().tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/candela/ca.pem"))
        );

        cfg.insecure = true;
        assert_eq!(
            cfg.to_controller_config().unwrap().tls,
            TlsVerification::DangerAcceptInvalid
        );
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            default_device_id: "porch".into(),
            ..Config::default()
        };

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }
}
