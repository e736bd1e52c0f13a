use crate::Panel;
use core_types::{LightColor, Line, LineParser, SignalUpdate, UserAction};
use parsers::SignalParser;

/// Per-color cycle durations and the tick period, injected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightDurations {
    pub green_ms: u64,
    pub yellow_ms: u64,
    pub red_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for LightDurations {
    fn default() -> Self {
        Self {
            green_ms: 10_000,
            yellow_ms: 3_000,
            red_ms: 5_000,
            tick_interval_ms: 100,
        }
    }
}

impl LightDurations {
    /// Default dwell time for a color, used when the local cycle enters it.
    pub fn for_color(&self, color: LightColor) -> u64 {
        match color {
            LightColor::Green => self.green_ms,
            LightColor::Yellow => self.yellow_ms,
            LightColor::Red => self.red_ms,
        }
    }
}

/// Model of the traffic-signal display.
///
/// Runs a local GREEN → YELLOW → RED countdown cycle, and accepts hardware
/// `STATE:` overrides that set the lamp and remaining time directly. A
/// hardware message always puts the cycle into the running state; stopping
/// is a purely local, user-driven act.
pub struct TrafficPanel {
    parser: SignalParser,
    durations: LightDurations,
    color: LightColor,
    remaining_ms: u64,
    running: bool,
}

impl TrafficPanel {
    /// Starts stopped, on GREEN with its full default duration.
    pub fn new(durations: LightDurations) -> Self {
        Self {
            parser: SignalParser::new(),
            durations,
            color: LightColor::Green,
            remaining_ms: durations.green_ms,
            running: false,
        }
    }

    pub fn color(&self) -> LightColor {
        self.color
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Resume the countdown from the current remaining time.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Freeze the countdown. The lamp keeps showing the current color.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    /// Back to the initial state: stopped, GREEN, full default duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.color = LightColor::Green;
        self.remaining_ms = self.durations.green_ms;
    }

    /// Apply a hardware override. A recognized color replaces the lamp;
    /// an unrecognized one keeps it. The remaining time is always taken,
    /// and the cycle is forced into the running state.
    pub fn apply(&mut self, update: SignalUpdate) {
        if let Some(color) = update.color {
            self.color = color;
        }
        self.remaining_ms = update.remaining_ms;
        self.running = true;
    }

    /// Advance the countdown by one tick interval. No-op while stopped.
    /// Reaching zero advances to the next color with its default duration.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(self.durations.tick_interval_ms);
        if self.remaining_ms == 0 {
            self.color = self.color.next();
            self.remaining_ms = self.durations.for_color(self.color);
        }
    }

    /// Countdown text: `"{COLOR}: {seconds} s"` with seconds rounded up,
    /// or `"Stopped"` while not running.
    pub fn countdown_label(&self) -> String {
        if !self.running {
            return "Stopped".to_string();
        }
        let seconds = (self.remaining_ms + 999) / 1000;
        format!("{}: {} s", self.color.label(), seconds)
    }

    /// Whether the lamp for `color` is drawn bright. Exactly one lamp is
    /// lit at a time, stopped or not.
    pub fn lamp_is_lit(&self, color: LightColor) -> bool {
        self.color == color
    }
}

impl Default for TrafficPanel {
    fn default() -> Self {
        Self::new(LightDurations::default())
    }
}

impl Panel for TrafficPanel {
    fn on_line(&mut self, line: &Line) -> bool {
        match self.parser.parse(&line.text) {
            Some(update) => {
                self.apply(update);
                true
            }
            None => false,
        }
    }

    fn on_tick(&mut self) {
        self.tick();
    }

    fn on_user_action(&mut self, action: UserAction) {
        match action {
            UserAction::ToggleRunning => self.toggle_running(),
            UserAction::Reset => self.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_panel() -> TrafficPanel {
        let mut panel = TrafficPanel::default();
        panel.start();
        panel
    }

    #[test]
    fn test_initial_state() {
        let panel = TrafficPanel::default();
        assert_eq!(panel.color(), LightColor::Green);
        assert_eq!(panel.remaining_ms(), 10_000);
        assert!(!panel.running());
        assert_eq!(panel.countdown_label(), "Stopped");
    }

    #[test]
    fn test_tick_decrements() {
        let mut panel = running_panel();
        panel.apply(SignalUpdate {
            color: Some(LightColor::Red),
            remaining_ms: 500,
        });
        panel.tick();
        assert_eq!(panel.remaining_ms(), 400);
        assert_eq!(panel.color(), LightColor::Red);
    }

    #[test]
    fn test_tick_advances_cycle_at_zero() {
        let mut panel = running_panel();
        panel.apply(SignalUpdate {
            color: Some(LightColor::Yellow),
            remaining_ms: 100,
        });
        panel.tick();
        // Yellow expired: next color with its default duration.
        assert_eq!(panel.color(), LightColor::Red);
        assert_eq!(panel.remaining_ms(), 5_000);
    }

    #[test]
    fn test_full_cycle_order() {
        let mut panel = running_panel();
        assert_eq!(panel.color(), LightColor::Green);
        for _ in 0..100 {
            panel.tick();
        }
        assert_eq!(panel.color(), LightColor::Yellow);
        for _ in 0..30 {
            panel.tick();
        }
        assert_eq!(panel.color(), LightColor::Red);
        for _ in 0..50 {
            panel.tick();
        }
        assert_eq!(panel.color(), LightColor::Green);
        assert_eq!(panel.remaining_ms(), 10_000);
    }

    #[test]
    fn test_tick_noop_while_stopped() {
        let mut panel = TrafficPanel::default();
        panel.tick();
        assert_eq!(panel.remaining_ms(), 10_000);
        assert_eq!(panel.color(), LightColor::Green);
    }

    #[test]
    fn test_hardware_update_forces_running() {
        let mut panel = TrafficPanel::default();
        assert!(!panel.running());
        assert!(panel.on_line(&Line::new("STATE:RED:4000", 0)));
        assert!(panel.running());
        assert_eq!(panel.color(), LightColor::Red);
        assert_eq!(panel.remaining_ms(), 4_000);
    }

    #[test]
    fn test_unknown_color_keeps_lamp() {
        let mut panel = running_panel();
        panel.on_line(&Line::new("STATE:RED:4000", 0));
        panel.stop();

        // Unknown token: lamp unchanged, time applied, running forced.
        assert!(panel.on_line(&Line::new("STATE:BLUE:2500", 0)));
        assert_eq!(panel.color(), LightColor::Red);
        assert_eq!(panel.remaining_ms(), 2_500);
        assert!(panel.running());
    }

    #[test]
    fn test_non_state_line_rejected() {
        let mut panel = TrafficPanel::default();
        assert!(!panel.on_line(&Line::new("TEMP:24.3", 0)));
        assert!(!panel.running());
    }

    #[test]
    fn test_toggle_freezes_and_resumes() {
        let mut panel = running_panel();
        panel.apply(SignalUpdate {
            color: Some(LightColor::Green),
            remaining_ms: 7_300,
        });

        panel.on_user_action(UserAction::ToggleRunning);
        assert!(!panel.running());
        assert_eq!(panel.countdown_label(), "Stopped");

        // Remaining time is preserved across the stop.
        panel.on_user_action(UserAction::ToggleRunning);
        assert!(panel.running());
        assert_eq!(panel.remaining_ms(), 7_300);
        assert_eq!(panel.countdown_label(), "GREEN: 8 s");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut panel = running_panel();
        panel.apply(SignalUpdate {
            color: Some(LightColor::Red),
            remaining_ms: 1_234,
        });

        panel.on_user_action(UserAction::Reset);
        let after_one = (panel.color(), panel.remaining_ms(), panel.running());
        panel.on_user_action(UserAction::Reset);
        let after_two = (panel.color(), panel.remaining_ms(), panel.running());

        assert_eq!(after_one, (LightColor::Green, 10_000, false));
        assert_eq!(after_one, after_two);
    }

    #[test]
    fn test_countdown_label_rounds_up() {
        let mut panel = running_panel();
        panel.apply(SignalUpdate {
            color: Some(LightColor::Red),
            remaining_ms: 4_000,
        });
        assert_eq!(panel.countdown_label(), "RED: 4 s");

        panel.tick();
        // 3900 ms reads as 4 s (ceiling).
        assert_eq!(panel.countdown_label(), "RED: 4 s");

        panel.apply(SignalUpdate {
            color: Some(LightColor::Red),
            remaining_ms: 3_001,
        });
        assert_eq!(panel.countdown_label(), "RED: 4 s");
    }

    #[test]
    fn test_exactly_one_lamp_lit() {
        let mut panel = running_panel();
        for _ in 0..200 {
            panel.tick();
            let lit: Vec<_> = LightColor::ALL
                .into_iter()
                .filter(|&c| panel.lamp_is_lit(c))
                .collect();
            assert_eq!(lit.len(), 1);
            assert_eq!(lit.first(), Some(&panel.color()));
        }
    }

    #[test]
    fn test_custom_durations() {
        let durations = LightDurations {
            green_ms: 300,
            yellow_ms: 200,
            red_ms: 100,
            tick_interval_ms: 100,
        };
        let mut panel = TrafficPanel::new(durations);
        panel.start();
        panel.tick();
        panel.tick();
        panel.tick();
        assert_eq!(panel.color(), LightColor::Yellow);
        assert_eq!(panel.remaining_ms(), 200);
    }
}
