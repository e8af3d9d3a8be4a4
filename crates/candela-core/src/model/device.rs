// ── Device domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::values::{Color, Direction, Program};

/// One physical candlestick controller as last reported by the backend.
///
/// `connected` is authoritative: the backend decides freshness, the
/// client never second-guesses it from `last_seen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub connected: bool,
    pub program: Option<Program>,
    /// Device is cycling programs by itself.
    pub random: Option<bool>,
    /// Raw speed as reported; the backend accepts a wider range than the
    /// client sends.
    pub speed: Option<u32>,
    pub direction: Option<Direction>,
    pub color: Option<Color>,
    pub last_seen: DateTime<Utc>,
}

impl Device {
    /// Whether `program` is the one running right now. A disconnected
    /// device never reports an active program.
    pub fn is_running(&self, program: &Program) -> bool {
        self.connected && self.program.as_ref() == Some(program)
    }

    /// Whether `direction` is the current one, with the same
    /// disconnected rule as [`is_running`](Self::is_running).
    pub fn is_heading(&self, direction: Direction) -> bool {
        self.connected && self.direction == Some(direction)
    }
}
