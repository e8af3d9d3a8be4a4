// ── Validated value types for device state and commands ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::CoreError;

// ── Program ─────────────────────────────────────────────────────────

/// Lighting animation mode.
///
/// Devices use the short names `rb` and `cop`; the long spellings are
/// accepted on input. Names this client doesn't know are kept verbatim
/// so newer firmware programs still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Program {
    Rainbow,
    Bounce,
    Fall,
    Police,
    Wave,
    StaticColor,
    Random,
    Stop,
    Other(String),
}

impl Program {
    /// Every program the client has a name for, in button order.
    pub const KNOWN: [Program; 8] = [
        Program::Rainbow,
        Program::Bounce,
        Program::Fall,
        Program::Police,
        Program::Wave,
        Program::StaticColor,
        Program::Random,
        Program::Stop,
    ];

    /// Wire name understood by the device.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rainbow => "rb",
            Self::Bounce => "bounce",
            Self::Fall => "fall",
            Self::Police => "cop",
            Self::Wave => "wave",
            Self::StaticColor => "static_color",
            Self::Random => "random",
            Self::Stop => "stop",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Program {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rb" | "rainbow" => Self::Rainbow,
            "bounce" => Self::Bounce,
            "fall" | "falling" | "waterfall" => Self::Fall,
            "cop" | "police" => Self::Police,
            "wave" => Self::Wave,
            "static_color" => Self::StaticColor,
            "random" => Self::Random,
            "stop" => Self::Stop,
            _ => Self::Other(name.to_owned()),
        }
    }
}

impl From<String> for Program {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<Program> for String {
    fn from(program: Program) -> Self {
        match program {
            Program::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl FromStr for Program {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Direction ───────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

// ── Speed ───────────────────────────────────────────────────────────

/// Animation speed accepted by the controls, `3..=40`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 40;

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::validation(
                "speed",
                format!("{value} is outside {}..={}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Speed {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Color ───────────────────────────────────────────────────────────

/// 24-bit RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::validation("color", format!("expected #rrggbb, got {s:?}"));

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(invalid)
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
