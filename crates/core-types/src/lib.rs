use serde::{Deserialize, Serialize};

/// A decoded, whitespace-trimmed line of telemetry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Line {
    /// The line text, without the terminating newline or surrounding whitespace.
    pub text: String,
    /// Timestamp in microseconds (relative to session start).
    /// This is the arrival time of the chunk that started the line.
    pub timestamp_us: u64,
}

impl Line {
    pub fn new(text: impl Into<String>, timestamp_us: u64) -> Self {
        Self {
            text: text.into(),
            timestamp_us,
        }
    }
}

/// The three lamps of a signal head, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightColor {
    Green,
    Yellow,
    Red,
}

impl LightColor {
    /// Lamps in display order (top to bottom).
    pub const ALL: [LightColor; 3] = [LightColor::Green, LightColor::Yellow, LightColor::Red];

    /// The next color in the GREEN -> YELLOW -> RED -> GREEN cycle.
    pub fn next(self) -> Self {
        match self {
            LightColor::Green => LightColor::Yellow,
            LightColor::Yellow => LightColor::Red,
            LightColor::Red => LightColor::Green,
        }
    }

    /// Uppercase wire/display token for this color.
    pub fn label(self) -> &'static str {
        match self {
            LightColor::Green => "GREEN",
            LightColor::Yellow => "YELLOW",
            LightColor::Red => "RED",
        }
    }
}

/// A hardware override decoded from a `STATE:` line.
///
/// `color` is None when the device sent a token outside the known set;
/// the display keeps its previous lamp but still applies the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalUpdate {
    pub color: Option<LightColor>,
    pub remaining_ms: u64,
}

/// User interactions a UI shell forwards to a display panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAction {
    ToggleRunning,
    Reset,
}

/// Trait for interpreting decoded lines as typed telemetry.
/// Implemented per wire protocol (temperature, signal state).
pub trait LineParser: Send {
    /// The typed value a matching line produces.
    type Output;

    /// Attempt to parse one line.
    /// Returns None if the line does not belong to this protocol;
    /// callers drop such lines (logging them at debug level).
    fn parse(&mut self, line: &str) -> Option<Self::Output>;
}
