use crate::Panel;
use core_types::{Line, LineParser};
use parsers::TemperatureParser;

const PLACEHOLDER: &str = "Temp: -- °C";

/// Model of the temperature readout: the single most recent reading.
/// No history is kept.
pub struct TemperaturePanel {
    parser: TemperatureParser,
    reading: Option<f64>,
}

impl TemperaturePanel {
    pub fn new() -> Self {
        Self {
            parser: TemperatureParser::new(),
            reading: None,
        }
    }

    pub fn reading(&self) -> Option<f64> {
        self.reading
    }

    /// The big label text: `Temp: {value:.1} °C`, or the placeholder
    /// before the first reading arrives.
    pub fn label(&self) -> String {
        match self.reading {
            Some(value) => format!("Temp: {value:.1} °C"),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Drop the current reading, restoring the placeholder.
    /// Called when the link closes.
    pub fn clear(&mut self) {
        self.reading = None;
    }
}

impl Default for TemperaturePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for TemperaturePanel {
    fn on_line(&mut self, line: &Line) -> bool {
        match self.parser.parse(&line.text) {
            Some(value) => {
                self.reading = Some(value);
                true
            }
            None => false,
        }
    }
}
