//! Device synchronization and command-dispatch engine between
//! `candela-api` and UI collaborators (CLI, web front-ends, panels).
//!
//! - **[`Controller`]**: Facade wiring everything below together from a
//!   [`ControllerConfig`]: [`start()`](Controller::start) begins polling,
//!   [`stop()`](Controller::stop) tears it down deterministically.
//!
//! - **[`DeviceRegistry`]**: Last-known-good device list plus an error
//!   flag, published through `tokio::sync::watch` channels.
//!
//! - **[`RegistryPoller`]**: Cancellable scheduled task that replaces the
//!   registry wholesale on every successful fetch and keeps the old list on
//!   failure.
//!
//! - **[`SelectionManager`]**: Owns the active device id. Auto-selects the
//!   first connected device when the selection is empty or disappears;
//!   otherwise a selection is sticky.
//!
//! - **[`CommandDispatcher`]**: Sends discrete commands immediately and
//!   rate-limits continuous inputs (speed slider, color picker) through a
//!   [`RateLimiter`] driven by an injectable [`Clock`].

pub mod clock;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod poller;
pub mod selection;
pub mod status;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::Command;
pub use config::{ApiMode, ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use dispatch::{CommandDispatcher, CommandRoute, Dispatch, InputStream, RateLimiter, Sent};
pub use error::CoreError;
pub use model::{Color, Device, Direction, Program, Speed};
pub use poller::RegistryPoller;
pub use selection::SelectionManager;
pub use status::LinkStatus;
pub use store::{DeviceRegistry, RegistryStatus};

pub use candela_api::HealthResponse;
