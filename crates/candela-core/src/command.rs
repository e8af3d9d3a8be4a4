// ── Command ──
//
// A partial device update. At least one field must be set before it
// can be dispatched; fields are sent as-is, never merged with what was
// sent before.

use serde::Serialize;

use crate::model::{Color, Direction, Program, Speed};

/// Partial `{program?, speed?, direction?, color?}` update for one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Command {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<Program>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Speed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Command {
    pub fn program(program: Program) -> Self {
        Self::default().with_program(program)
    }

    pub fn speed(speed: Speed) -> Self {
        Self::default().with_speed(speed)
    }

    pub fn direction(direction: Direction) -> Self {
        Self::default().with_direction(direction)
    }

    pub fn color(color: Color) -> Self {
        Self::default().with_color(color)
    }

    pub fn with_program(mut self, program: Program) -> Self {
        self.program = Some(program);
        self
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// `true` when no field is set. Such a command is never sent.
    pub fn is_empty(&self) -> bool {
        self.program.is_none()
            && self.speed.is_none()
            && self.direction.is_none()
            && self.color.is_none()
    }

    /// Split off the color, leaving the remaining fields. Used by the
    /// legacy route, which takes colors on a separate endpoint.
    pub(crate) fn take_color(&mut self) -> Option<Color> {
        self.color.take()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_command_is_empty() {
        assert!(Command::default().is_empty());
        assert!(!Command::direction(Direction::Up).is_empty());
    }

    #[test]
    fn builder_sets_only_requested_fields() {
        let cmd = Command::program(Program::Police).with_speed(Speed::new(20).unwrap());
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({ "program": "cop", "speed": 20 })
        );
    }
}
