//! `watch`: poll the registry and print the derived link status on change.

use chrono::Local;
use serde::Serialize;
use tracing::info;

use candela_core::{Controller, LinkStatus};

use crate::error::CliError;
use crate::output::{self, Output};

#[derive(Serialize)]
struct StatusEvent<'a> {
    at: String,
    #[serde(flatten)]
    status: &'a LinkStatus,
}

fn render(status: &LinkStatus, out: &Output) -> String {
    let at = Local::now();
    if out.is_json() {
        return output::render_json_line(&StatusEvent {
            at: at.to_rfc3339(),
            status,
        });
    }

    let line = status.to_string();
    let line = match status {
        LinkStatus::Connected { .. } => out.highlight(&line),
        LinkStatus::BackendUnreachable { .. } => out.warn(&line),
        LinkStatus::Connecting | LinkStatus::Disconnected { .. } => line,
    };
    format!("{}  {line}", at.format("%H:%M:%S"))
}

pub async fn handle(controller: &Controller, out: &Output) -> Result<(), CliError> {
    let mut devices = controller.subscribe_devices();
    let mut registry = controller.subscribe_registry_status();
    let mut selection = controller.subscribe_selection();

    controller.start().await?;

    let mut last = controller.link_status();
    output::print_output(&render(&last, out), out.quiet);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            biased;
            signal = &mut ctrl_c => break signal.map_err(CliError::from),
            changed = devices.changed() => if changed.is_err() { break Ok(()) },
            changed = registry.changed() => if changed.is_err() { break Ok(()) },
            changed = selection.changed() => if changed.is_err() { break Ok(()) },
        }

        let status = controller.link_status();
        if status != last {
            output::print_output(&render(&status, out), out.quiet);
            last = status;
        }
    };

    controller.stop().await;
    info!("watch stopped");
    result
}
