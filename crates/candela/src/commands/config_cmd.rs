//! Config subcommand handlers.

use candela_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::error::CliError;
use crate::output::{self, Output};

pub fn print_path() {
    output::print_output(&candela_config::config_path().display().to_string(), false);
}

pub fn handle(args: ConfigArgs, cfg: &Config, out: &Output) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            print_path();
            Ok(())
        }

        ConfigCommand::Show => {
            let rendered = if out.is_json() {
                output::render_json(cfg)
            } else {
                toml::to_string_pretty(cfg)?
            };
            output::print_output(rendered.trim_end(), out.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = candela_config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            candela_config::save_config(&Config::default())?;
            if !out.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}
