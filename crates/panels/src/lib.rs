//! Display state machines for the telemetry apps.
//!
//! A panel is the pure, toolkit-agnostic model behind a window: it consumes
//! decoded lines, timer ticks, and user actions, and exposes the resulting
//! display state. The GUI shells are dispatchers around these hooks and
//! contain no telemetry logic of their own, so everything user-visible is
//! testable here without a GUI.

mod temperature;
mod traffic;

pub use temperature::TemperaturePanel;
pub use traffic::{LightDurations, TrafficPanel};

use core_types::{Line, UserAction};

/// Hook surface a UI shell drives a panel through.
pub trait Panel: Send {
    /// Feed one decoded telemetry line.
    /// Returns false when the line does not belong to this panel's
    /// protocol; callers log and drop such lines.
    fn on_line(&mut self, line: &Line) -> bool;

    /// Advance by one timer tick. No-op for panels without a countdown.
    fn on_tick(&mut self) {}

    /// Apply a user interaction.
    fn on_user_action(&mut self, _action: UserAction) {}
}
