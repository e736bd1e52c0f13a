use core_types::{LightColor, LineParser, SignalUpdate};

/// Parses traffic-signal state lines of the form `STATE:<COLOR>:<remainingMs>`.
///
/// The prefix is matched case-insensitively. The color token maps to
/// GREEN/YELLOW/RED; anything else yields `color: None` so the display keeps
/// its previous lamp. A missing or malformed time field reads as 0 and
/// negative values clamp to 0. Extra `:`-separated fields are ignored.
pub struct SignalParser;

impl SignalParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SignalParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for SignalParser {
    type Output = SignalUpdate;

    fn parse(&mut self, line: &str) -> Option<SignalUpdate> {
        let prefix = line.get(..6)?;
        if !prefix.eq_ignore_ascii_case("STATE:") {
            return None;
        }
        let payload = line.get(6..)?;
        let mut fields = payload.split(':');

        let color = match fields.next().map(|t| t.trim().to_ascii_uppercase()) {
            Some(token) => match token.as_str() {
                "GREEN" => Some(LightColor::Green),
                "YELLOW" => Some(LightColor::Yellow),
                "RED" => Some(LightColor::Red),
                _ => None,
            },
            None => None,
        };

        let remaining_ms = fields
            .next()
            .and_then(|t| t.trim().parse::<i64>().ok())
            .unwrap_or(0)
            .max(0) as u64;

        Some(SignalUpdate { color, remaining_ms })
    }
}
