use crate::state::LinkState;
use core_types::Line;
use serde::{Deserialize, Serialize};

/// Serial port information for listing and connection requests.
/// A simplified, serializable view of what enumeration reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortInfo {
    /// System path or name, e.g. "/dev/ttyUSB0" or "COM3".
    pub name: String,
    /// Product description from USB metadata, if any.
    pub description: Option<String>,
    /// Manufacturer from USB metadata, if any.
    pub manufacturer: Option<String>,
}

impl PortInfo {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        manufacturer: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            manufacturer,
        }
    }

    /// Text shown in port pickers: "NAME - DESCRIPTION" when a description
    /// exists, bare name otherwise.
    pub fn display_label(&self) -> String {
        match &self.description {
            Some(desc) if !desc.is_empty() => format!("{} - {}", self.name, desc),
            _ => self.name.clone(),
        }
    }
}

/// Serial configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: ParityMode,
    pub flow_control: FlowControl,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParityMode {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FlowControl {
    None,
    Hardware,
    Software,
}

impl SerialSettings {
    /// Create a standard 8N1 no-flow-control configuration at the given baud.
    /// Both telemetry protocols use this framing.
    pub fn new_8n1(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: 8,
            stop_bits: 1,
            parity: ParityMode::None,
            flow_control: FlowControl::None,
        }
    }
}

/// Commands from UI to the actor system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UiCommand {
    /// Enumerate available serial ports
    RefreshPorts,

    /// Request to connect to a serial port
    Connect {
        port: PortInfo,
        settings: SerialSettings,
        /// Bytes written once after a successful open (e.g. a state request).
        greeting: Option<Vec<u8>>,
    },

    /// Request to disconnect from the current port
    Disconnect,

    /// Write raw bytes to the connected port
    WriteData { data: Vec<u8> },
}

/// Events from the actor system to UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UiEvent {
    /// Link state has changed
    StateChanged { state: LinkState },

    /// Result of a RefreshPorts command
    PortsListed { ports: Vec<PortInfo> },

    /// A complete telemetry line arrived
    LineReceived { line: Line },

    /// Error occurred; user-facing message
    Error { message: String },
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_port_info_serialization() {
        let info = PortInfo::new("/dev/ttyUSB0", Some("CH340 adapter".into()), None);
        let json = serde_json::to_string(&info).unwrap();
        let deserialized: PortInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, deserialized);
    }

    #[test]
    fn test_port_display_label() {
        let with_desc = PortInfo::new("COM3", Some("Arduino Uno".into()), None);
        assert_eq!(with_desc.display_label(), "COM3 - Arduino Uno");

        let bare = PortInfo::new("/dev/ttyACM0", None, None);
        assert_eq!(bare.display_label(), "/dev/ttyACM0");

        let empty_desc = PortInfo::new("/dev/ttyACM0", Some(String::new()), None);
        assert_eq!(empty_desc.display_label(), "/dev/ttyACM0");
    }

    #[test]
    fn test_ui_command_serialization() {
        let cmd = UiCommand::Connect {
            port: PortInfo::new("/dev/ttyUSB0", None, None),
            settings: SerialSettings::new_8n1(115200),
            greeting: Some(b"REQ\n".to_vec()),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: UiCommand = serde_json::from_str(&json).unwrap();

        match deserialized {
            UiCommand::Connect {
                port,
                settings,
                greeting,
            } => {
                assert_eq!(port.name, "/dev/ttyUSB0");
                assert_eq!(settings.baud_rate, 115200);
                assert_eq!(greeting, Some(b"REQ\n".to_vec()));
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_ui_event_serialization() {
        let event = UiEvent::StateChanged {
            state: LinkState::Connected,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: UiEvent = serde_json::from_str(&json).unwrap();

        match deserialized {
            UiEvent::StateChanged { state } => {
                assert_eq!(state, LinkState::Connected);
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_serial_settings_8n1() {
        let settings = SerialSettings::new_8n1(9600);
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.data_bits, 8);
        assert_eq!(settings.stop_bits, 1);
        assert_eq!(settings.parity, ParityMode::None);
        assert_eq!(settings.flow_control, FlowControl::None);
    }
}
