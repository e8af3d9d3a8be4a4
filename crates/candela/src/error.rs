//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use candela_config::ConfigError;
use candela_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend: {message}")]
    #[diagnostic(
        code(candela::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Set it with --backend or backend_url in the config file."
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out: {message}")]
    #[diagnostic(
        code(candela::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { message: String },

    // ── Devices ──────────────────────────────────────────────────────
    #[error("Candlestick '{identifier}' is not connected")]
    #[diagnostic(
        code(candela::not_found),
        help("Run: candela devices to see registered candlesticks")
    )]
    NotFound { identifier: String },

    #[error("No active candlestick")]
    #[diagnostic(
        code(candela::no_active_device),
        help("No candlestick is registered yet. Pass --device to pick one explicitly.")
    )]
    NoActiveDevice,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(candela::api_error))]
    ApiError { message: String },

    #[error("'{operation}' is not available in {mode} mode")]
    #[diagnostic(
        code(candela::unsupported),
        help("Switch with --mode registry or set mode = \"registry\" in the config file.")
    )]
    Unsupported { operation: String, mode: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(candela::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(candela::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(candela::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_timeout() {
            return CliError::Timeout {
                message: err.to_string(),
            };
        }
        if err.is_unreachable() {
            return CliError::ConnectionFailed {
                message: err.to_string(),
            };
        }

        match err {
            CoreError::DeviceNotFound { identifier } => CliError::NotFound { identifier },

            CoreError::NoActiveDevice => CliError::NoActiveDevice,

            CoreError::EmptyCommand => CliError::Validation {
                field: "command".into(),
                reason: "pass at least one of --program, --speed, --direction, --color".into(),
            },

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::Unsupported { operation, mode } => CliError::Unsupported { operation, mode },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },

            other @ (CoreError::RegistryFetch { .. }
            | CoreError::CommandDispatch { .. }
            | CoreError::Api { .. }) => CliError::ApiError {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}
