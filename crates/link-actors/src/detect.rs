//! Port enumeration and auto-detection.

use protocol::{ActorError, PortInfo};
use serialport::SerialPortType;

/// Substrings (lowercase) marking a port as a likely telemetry device:
/// Arduino boards and the common CH340/WCH USB-serial adapters, plus a
/// generic catch-all for anything USB.
const USB_HINTS: [&str; 4] = ["arduino", "ch340", "wch", "usb"];

/// Enumerate serial ports, carrying over USB product/manufacturer metadata
/// where the platform reports it.
pub fn list_ports() -> Result<Vec<PortInfo>, ActorError> {
    let ports = serialport::available_ports()
        .map_err(|e| ActorError::Transport(format!("Port enumeration failed: {}", e)))?;

    Ok(ports
        .into_iter()
        .map(|p| match p.port_type {
            SerialPortType::UsbPort(usb) => {
                PortInfo::new(p.port_name, usb.product, usb.manufacturer)
            }
            _ => PortInfo::new(p.port_name, None, None),
        })
        .collect())
}

/// Pick the port the telemetry device is most likely attached to: the first
/// whose description or manufacturer matches a USB adapter hint
/// (case-insensitive), falling back to the first enumerated port. None only
/// when no ports exist at all.
pub fn auto_detect(ports: &[PortInfo]) -> Option<&PortInfo> {
    ports
        .iter()
        .find(|p| matches_hint(p))
        .or_else(|| ports.first())
}

fn matches_hint(port: &PortInfo) -> bool {
    port.description
        .iter()
        .chain(port.manufacturer.iter())
        .any(|text| {
            let lower = text.to_lowercase();
            USB_HINTS.iter().any(|hint| lower.contains(hint))
        })
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn port(name: &str, description: Option<&str>, manufacturer: Option<&str>) -> PortInfo {
        PortInfo::new(
            name,
            description.map(str::to_string),
            manufacturer.map(str::to_string),
        )
    }

    #[test]
    fn test_prefers_hinted_port_over_first() {
        let ports = vec![
            port("/dev/ttyS0", None, None),
            port("/dev/ttyUSB0", Some("Arduino Uno"), None),
        ];
        assert_eq!(auto_detect(&ports).unwrap().name, "/dev/ttyUSB0");
    }

    #[test]
    fn test_hint_is_case_insensitive() {
        let ports = vec![
            port("/dev/ttyS0", None, None),
            port("/dev/ttyUSB1", Some("CH340 serial converter"), None),
        ];
        assert_eq!(auto_detect(&ports).unwrap().name, "/dev/ttyUSB1");
    }

    #[test]
    fn test_manufacturer_counts_as_hint() {
        let ports = vec![
            port("/dev/ttyS0", Some("Onboard UART"), None),
            port("/dev/ttyACM0", None, Some("wch.cn")),
        ];
        assert_eq!(auto_detect(&ports).unwrap().name, "/dev/ttyACM0");
    }

    #[test]
    fn test_first_hinted_port_wins() {
        let ports = vec![
            port("COM3", Some("USB-SERIAL CH340"), None),
            port("COM4", Some("Arduino Mega"), None),
        ];
        assert_eq!(auto_detect(&ports).unwrap().name, "COM3");
    }

    #[test]
    fn test_falls_back_to_first_port() {
        let ports = vec![
            port("/dev/ttyS0", Some("Onboard UART"), None),
            port("/dev/ttyS1", None, None),
        ];
        assert_eq!(auto_detect(&ports).unwrap().name, "/dev/ttyS0");
    }

    #[test]
    fn test_no_ports() {
        assert!(auto_detect(&[]).is_none());
    }
}
