use core_types::LineParser;

/// Parses temperature telemetry lines.
///
/// The canonical form is `TEMP:<float>` (prefix matched case-insensitively).
/// Anything else is scanned for the first decimal number in the line, so
/// free-form firmware output like `reading = 24.3 C` still works. Lines
/// with no number at all do not match.
pub struct TemperatureParser;

impl TemperatureParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TemperatureParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for TemperatureParser {
    type Output = f64;

    fn parse(&mut self, line: &str) -> Option<f64> {
        if let Some(prefix) = line.get(..5) {
            if prefix.eq_ignore_ascii_case("TEMP:") {
                if let Some(rest) = line.get(5..) {
                    if let Ok(value) = rest.trim().parse::<f64>() {
                        return Some(value);
                    }
                }
                // Malformed payload after the prefix falls through to the
                // scan, e.g. "TEMP: 24.3 C".
            }
        }
        scan_number(line)
    }
}

/// Find the first substring of `s` that reads as an optionally signed
/// decimal number: `[-+]?digits`, `[-+]?digits.digits`, or `[-+]?.digits`.
fn scan_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(end) = match_number(bytes, i) {
            if let Some(token) = s.get(i..end) {
                return token.parse::<f64>().ok();
            }
        }
        i += 1;
    }
    None
}

/// Try to match a number starting exactly at `start`; returns the end index.
fn match_number(bytes: &[u8], start: usize) -> Option<usize> {
    let mut j = start;
    if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
        j += 1;
    }
    let int_start = j;
    while bytes.get(j).is_some_and(u8::is_ascii_digit) {
        j += 1;
    }
    let int_len = j - int_start;
    if bytes.get(j) == Some(&b'.') {
        let mut k = j + 1;
        while bytes.get(k).is_some_and(u8::is_ascii_digit) {
            k += 1;
        }
        if k > j + 1 {
            // Fractional digits present: take the full "12.5" / ".5" form.
            return Some(k);
        }
    }
    // No usable fraction; "24." yields "24", a bare sign or dot is no match.
    if int_len > 0 {
        Some(j)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<f64> {
        TemperatureParser::new().parse(line)
    }

    #[test]
    fn test_canonical_prefix() {
        assert_eq!(parse("TEMP:24.3"), Some(24.3));
        assert_eq!(parse("TEMP:-3.5"), Some(-3.5));
        assert_eq!(parse("TEMP: 21.0"), Some(21.0));
    }

    #[test]
    fn test_prefix_case_insensitive() {
        assert_eq!(parse("temp:24.3"), Some(24.3));
        assert_eq!(parse("Temp:24.3"), Some(24.3));
    }

    #[test]
    fn test_fallback_scan() {
        assert_eq!(parse("reading = 24.3 C"), Some(24.3));
        assert_eq!(parse("t=-7"), Some(-7.0));
        assert_eq!(parse("humidity 40, temp 21.5"), Some(40.0));
    }

    #[test]
    fn test_prefix_with_trailing_junk_scans() {
        // The payload after TEMP: is not a clean float, so the whole line
        // is scanned instead.
        assert_eq!(parse("TEMP: 24.3 C"), Some(24.3));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("+-."), None);
    }

    #[test]
    fn test_bare_fraction_and_trailing_dot() {
        assert_eq!(parse("x .5 y"), Some(0.5));
        assert_eq!(parse("24."), Some(24.0));
    }

    #[test]
    fn test_non_ascii_noise() {
        assert_eq!(parse("température 19.5 °C"), Some(19.5));
    }
}
