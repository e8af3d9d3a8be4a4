//! `send`: one command to one candlestick.

use serde::Serialize;

use candela_core::{Color, Command, Controller, Program, Speed};

use crate::cli::SendArgs;
use crate::error::CliError;
use crate::output::{self, Output};

#[derive(Serialize)]
struct SentView<'a> {
    device_id: &'a str,
    message: &'a str,
    command: &'a Command,
}

fn build_command(args: SendArgs) -> Result<Command, CliError> {
    let mut cmd = Command::default();

    if let Some(name) = args.program {
        let program = Program::from(name.as_str());
        if matches!(program, Program::Other(_)) {
            return Err(CliError::Validation {
                field: "program".into(),
                reason: format!(
                    "unknown program '{name}', expected one of: {}",
                    Program::KNOWN
                        .iter()
                        .map(Program::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }
        cmd = cmd.with_program(program);
    }
    if let Some(speed) = args.speed {
        cmd = cmd.with_speed(Speed::new(speed)?);
    }
    if let Some(direction) = args.direction {
        cmd = cmd.with_direction(direction.into());
    }
    if let Some(ref raw) = args.color {
        let color: Color = raw.parse()?;
        cmd = cmd.with_color(color);
    }

    Ok(cmd)
}

pub async fn handle(
    controller: &Controller,
    args: SendArgs,
    device_id: &str,
    out: &Output,
) -> Result<(), CliError> {
    let cmd = build_command(args)?;
    let sent = controller.dispatcher().send(device_id, &cmd).await?;

    let view = SentView {
        device_id: &sent.device_id,
        message: &sent.message,
        command: &cmd,
    };
    let rendered = output::render_single(out, &view, |v| {
        format!("{}: {}", out.highlight(v.device_id), v.message)
    });
    output::print_output(&rendered, out.quiet);
    Ok(())
}
