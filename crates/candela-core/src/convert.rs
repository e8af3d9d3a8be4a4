// ── API-to-domain type conversions ──
//
// Bridges raw `candela_api` wire types into canonical `candela_core`
// domain types. Anything that doesn't fit the device schema is an error
// here: a registry fetch carrying such a payload counts as failed.

use chrono::{DateTime, NaiveDateTime, Utc};

use candela_api::{CandlestickState, CommandBody};

use crate::command::Command;
use crate::error::CoreError;
use crate::model::{Color, Device, Direction, Program};

// ── Timestamps ──────────────────────────────────────────────────────

/// Parse a backend timestamp.
///
/// RFC 3339 is preferred; offset-less ISO-8601 (what a naive Python
/// `datetime` serializes to) is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// ── Device ──────────────────────────────────────────────────────────

impl TryFrom<CandlestickState> for Device {
    type Error = CoreError;

    fn try_from(s: CandlestickState) -> Result<Self, Self::Error> {
        let field_error = |field: &str, reason: String| {
            CoreError::validation(field, format!("device '{}': {reason}", s.id))
        };

        let speed = s
            .speed
            .map(|v| {
                u32::try_from(v).map_err(|_| field_error("speed", format!("out of range value {v}")))
            })
            .transpose()?;

        let direction = s
            .direction
            .as_deref()
            .map(|d| {
                d.parse::<Direction>()
                    .map_err(|_| field_error("direction", format!("unknown value {d:?}")))
            })
            .transpose()?;

        let color = s
            .color
            .as_deref()
            .map(|c| {
                c.parse::<Color>()
                    .map_err(|_| field_error("color", format!("expected #rrggbb, got {c:?}")))
            })
            .transpose()?;

        let last_seen = parse_timestamp(&s.last_seen).ok_or_else(|| {
            field_error("last_seen", format!("unparseable timestamp {:?}", s.last_seen))
        })?;

        Ok(Device {
            program: s.program.map(Program::from),
            random: s.random,
            speed,
            direction,
            color,
            last_seen,
            connected: s.connected,
            id: s.id,
        })
    }
}

/// Convert a full registry listing, enforcing unique ids.
pub fn devices_from_states(states: Vec<CandlestickState>) -> Result<Vec<Device>, CoreError> {
    let mut devices: Vec<Device> = Vec::with_capacity(states.len());
    for state in states {
        let device = Device::try_from(state)?;
        if devices.iter().any(|d| d.id == device.id) {
            return Err(CoreError::validation(
                "id",
                format!("duplicate device id '{}' in registry", device.id),
            ));
        }
        devices.push(device);
    }
    Ok(devices)
}

// ── Command ─────────────────────────────────────────────────────────

impl From<&Command> for CommandBody {
    fn from(cmd: &Command) -> Self {
        CommandBody {
            program: cmd.program.as_ref().map(|p| p.as_str().to_owned()),
            speed: cmd.speed.map(u8::from),
            direction: cmd.direction.map(|d| d.to_string()),
            color: cmd.color.map(|c| c.to_string()),
        }
    }
}
