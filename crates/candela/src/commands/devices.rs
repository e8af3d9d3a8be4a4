//! Device listing and lookup.

use tabled::Tabled;

use candela_core::{Controller, Device};

use crate::error::CliError;
use crate::output::{self, Output};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "")]
    active: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Program")]
    program: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

fn row(d: &Device, selected: Option<&str>, out: &Output) -> DeviceRow {
    DeviceRow {
        active: if selected == Some(d.id.as_str()) { "*" } else { "" },
        id: d.id.clone(),
        state: out.connected_label(d.connected),
        program: program_label(d),
        speed: d.speed.map_or_else(|| "-".into(), |s| s.to_string()),
        direction: d.direction.map_or_else(|| "-".into(), |x| x.to_string()),
        color: d.color.map_or_else(|| "-".into(), |c| c.to_string()),
        last_seen: d.last_seen.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

fn program_label(d: &Device) -> String {
    let name = d.program.as_ref().map_or_else(|| "-".into(), ToString::to_string);
    if d.random == Some(true) {
        format!("{name} (random)")
    } else {
        name
    }
}

fn detail(d: &Device, out: &Output) -> String {
    [
        format!("ID:        {}", out.highlight(&d.id)),
        format!("State:     {}", out.connected_label(d.connected)),
        format!("Program:   {}", program_label(d)),
        format!(
            "Speed:     {}",
            d.speed.map_or_else(|| "-".into(), |s| s.to_string())
        ),
        format!(
            "Direction: {}",
            d.direction.map_or_else(|| "-".into(), |x| x.to_string())
        ),
        format!(
            "Color:     {}",
            d.color.map_or_else(|| "-".into(), |c| c.to_string())
        ),
        format!("Last seen: {}", d.last_seen.to_rfc3339()),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(controller: &Controller, out: &Output) -> Result<(), CliError> {
    let devices = controller.refresh().await?;
    let selected = controller.selected_id();

    if devices.is_empty() && !out.is_json() {
        output::print_output(&out.warn("No candlesticks registered"), out.quiet);
        return Ok(());
    }

    let rendered = output::render_list(out, devices.as_slice(), |d| row(d, selected.as_deref(), out));
    output::print_output(&rendered, out.quiet);
    Ok(())
}

pub async fn get(controller: &Controller, id: &str, out: &Output) -> Result<(), CliError> {
    let device = controller.device(id).await?;
    let rendered = output::render_single(out, &device, |d| detail(d, out));
    output::print_output(&rendered, out.quiet);
    Ok(())
}
