//! `health`: backend liveness and registered-device count.

use candela_core::{Controller, HealthResponse};

use crate::error::CliError;
use crate::output::{self, Output};

fn detail(h: &HealthResponse, out: &Output) -> String {
    [
        format!("Status:       {}", out.highlight(&h.status)),
        format!("Service:      {}", h.service.as_deref().unwrap_or("-")),
        format!("Candlesticks: {}", h.connected_candlesticks),
    ]
    .join("\n")
}

pub async fn handle(controller: &Controller, out: &Output) -> Result<(), CliError> {
    let health = controller.health().await?;
    let rendered = output::render_single(out, &health, |h| detail(h, out));
    output::print_output(&rendered, out.quiet);
    Ok(())
}
