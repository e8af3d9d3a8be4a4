//! Layer CLI flags over the loaded configuration.

use candela_config::Config;
use candela_core::ApiMode;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Load file + env config and apply global flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = candela_config::load_config()?;
    apply_overrides(&mut cfg, global);
    cfg.validate()?;
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.backend {
        cfg.backend_url.clone_from(url);
    }
    if let Some(ref device) = global.device {
        cfg.default_device_id.clone_from(device);
    }
    if let Some(mode) = global.mode {
        cfg.mode = ApiMode::from(mode).to_string();
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout_secs = timeout;
    }
    if let Some(format) = global.output {
        cfg.output = match format {
            OutputFormat::Table => "table".into(),
            OutputFormat::Json => "json".into(),
        };
    }
    if global.insecure {
        cfg.insecure = true;
    }
}

/// The output format the resolved config asks for.
pub fn output_format(cfg: &Config) -> OutputFormat {
    if cfg.output == "json" {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    }
}
