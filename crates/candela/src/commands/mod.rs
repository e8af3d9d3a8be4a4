//! Command dispatch: bridges CLI args -> engine calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod health;
pub mod send;
pub mod watch;

use candela_config::Config;
use candela_core::Controller;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::Output;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    cfg: &Config,
    out: &Output,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices => devices::list(controller, out).await,
        Command::Get { id } => devices::get(controller, &id, out).await,
        Command::Send(args) => send::handle(controller, args, &cfg.default_device_id, out).await,
        Command::Watch(_) => watch::handle(controller, out).await,
        Command::Health => health::handle(controller, out).await,
        // Config is handled before a controller is built
        Command::Config(args) => config_cmd::handle(args, cfg, out),
    }
}
