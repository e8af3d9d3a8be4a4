mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use candela_core::Controller;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Output;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config path` must work even when the file itself is broken
    if let Command::Config(ref args) = cli.command {
        if matches!(args.command, cli::ConfigCommand::Path) {
            commands::config_cmd::print_path();
            return Ok(());
        }
    }

    let mut cfg = config::resolve(&cli.global)?;
    if let Command::Watch(ref args) = cli.command {
        if let Some(ms) = args.interval_ms {
            cfg.poll_interval_ms = ms;
            cfg.validate()?;
        }
    }

    let out = Output::new(config::output_format(&cfg), cli.global.quiet, cli.global.color);

    match cli.command {
        Command::Config(args) => commands::config_cmd::handle(args, &cfg, &out),
        cmd => {
            let controller = Controller::new(cfg.to_controller_config()?)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &controller, &cfg, &out).await
        }
    }
}
