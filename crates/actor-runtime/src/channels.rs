use futures_channel::mpsc;
use protocol::{PortInfo, SerialSettings, UiCommand, UiEvent};

/// Messages handled by the LinkActor (connection state machine)
#[derive(Debug, Clone)]
pub enum LinkMessage {
    /// Commands from UI
    UiCommand(UiCommand),

    /// Port opened successfully (sent by PortActor)
    Opened,

    /// Port open failed (sent by PortActor)
    OpenFailed { reason: String },

    /// Device-level read failure mid-session (sent by the reader thread)
    Lost,

    /// Port has been fully closed (sent by PortActor after close completes)
    Closed,
}

/// Messages handled by the PortActor (serial I/O)
#[derive(Debug, Clone)]
pub enum PortMessage {
    Open {
        port: PortInfo,
        settings: SerialSettings,
        /// Bytes written once immediately after a successful open.
        greeting: Option<Vec<u8>>,
    },
    Close,
    Write {
        data: Vec<u8>,
    },
}

/// Handles for spawning actors
pub struct ActorHandles {
    pub link_rx: mpsc::Receiver<LinkMessage>,
    pub port_rx: mpsc::Receiver<PortMessage>,
    pub event_tx: mpsc::Sender<UiEvent>,
}

/// Channel manager for actor communication
///
/// Owns the senders into the actor system and the UI-side event receiver,
/// and routes `UiCommand`s to the actor responsible for them.
pub struct ChannelManager {
    // Senders for each actor (all Clone).
    // Bounded channels so a stuck consumer cannot exhaust memory.
    link_tx: mpsc::Sender<LinkMessage>,
    port_tx: mpsc::Sender<PortMessage>,

    // Event receiver; taken once by the UI with take_event_receiver().
    event_rx: mpsc::Receiver<UiEvent>,
}

impl ChannelManager {
    /// Create a new channel manager and actor handles
    ///
    /// Returns (ChannelManager for UI, ActorHandles for spawning actors)
    ///
    /// Capacities: command/control channels are low frequency; the event
    /// channel absorbs line telemetry between UI frames (a 115200 baud
    /// device emits well under 1024 lines per frame).
    pub fn new() -> (Self, ActorHandles) {
        let (link_tx, link_rx) = mpsc::channel(256);
        let (port_tx, port_rx) = mpsc::channel(256);
        let (event_tx, event_rx) = mpsc::channel(1024);

        let handles = ActorHandles {
            link_rx,
            port_rx,
            event_tx,
        };

        let manager = Self {
            link_tx,
            port_tx,
            event_rx,
        };

        (manager, handles)
    }

    /// Send a UI command to the appropriate actor
    pub fn send_command(&self, cmd: UiCommand) -> Result<(), String> {
        match cmd {
            UiCommand::Connect { .. } | UiCommand::Disconnect | UiCommand::RefreshPorts => {
                self.link_tx
                    .clone()
                    .try_send(LinkMessage::UiCommand(cmd))
                    .map_err(|e| {
                        if e.is_full() {
                            "System overloaded: Too many pending commands. Please slow down."
                                .to_string()
                        } else {
                            "System error: Link management unavailable.".to_string()
                        }
                    })?;
            }
            UiCommand::WriteData { data } => {
                self.port_tx
                    .clone()
                    .try_send(PortMessage::Write { data })
                    .map_err(|e| {
                        if e.is_full() {
                            "System overloaded: Write queue full.".to_string()
                        } else {
                            "System error: Port communication unavailable.".to_string()
                        }
                    })?;
            }
        }
        Ok(())
    }

    /// Take ownership of event receiver
    ///
    /// The receiver should only be taken once; events sent after the take
    /// land in the moved receiver, not in the manager.
    pub fn take_event_receiver(&mut self) -> mpsc::Receiver<UiEvent> {
        let (_new_tx, new_rx) = mpsc::channel(1);
        std::mem::replace(&mut self.event_rx, new_rx)
    }

    /// Clone senders for direct actor-to-actor communication
    ///
    /// These clones can be passed to actors for internal messaging
    pub fn link_sender(&self) -> mpsc::Sender<LinkMessage> {
        self.link_tx.clone()
    }

    pub fn port_sender(&self) -> mpsc::Sender<PortMessage> {
        self.port_tx.clone()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use futures::stream::StreamExt;

    #[tokio::test]
    async fn test_channel_manager_creation() {
        let (_manager, _handles) = ChannelManager::new();
        // Just verify it can be created
    }

    #[tokio::test]
    async fn test_send_connect_command() {
        let (manager, mut handles) = ChannelManager::new();

        let cmd = UiCommand::Connect {
            port: PortInfo::new("/dev/ttyUSB0", None, None),
            settings: SerialSettings::new_8n1(115200),
            greeting: Some(b"REQ\n".to_vec()),
        };

        manager.send_command(cmd).unwrap();

        // Verify message was routed to the LinkActor
        let msg = handles.link_rx.next().await.unwrap();
        match msg {
            LinkMessage::UiCommand(UiCommand::Connect { port, settings, .. }) => {
                assert_eq!(port.name, "/dev/ttyUSB0");
                assert_eq!(settings.baud_rate, 115200);
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[tokio::test]
    async fn test_send_write_command() {
        let (manager, mut handles) = ChannelManager::new();

        let cmd = UiCommand::WriteData {
            data: b"REQ\n".to_vec(),
        };

        manager.send_command(cmd).unwrap();

        // Verify message was routed to the PortActor
        let msg = handles.port_rx.next().await.unwrap();
        match msg {
            PortMessage::Write { data } => {
                assert_eq!(data, b"REQ\n");
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[tokio::test]
    async fn test_take_event_receiver() {
        let (mut manager, mut handles) = ChannelManager::new();
        let mut event_rx = manager.take_event_receiver();

        // Simulate an actor sending an event
        handles
            .event_tx
            .try_send(UiEvent::Error {
                message: "Test".into(),
            })
            .ok();

        // Drop handles to close channels
        drop(handles);

        // The taken receiver sees the event
        let event = event_rx.next().await.unwrap();
        match event {
            UiEvent::Error { message } => {
                assert_eq!(message, "Test");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[tokio::test]
    async fn test_actor_to_actor_messaging() {
        let (manager, mut handles) = ChannelManager::new();

        // Get a clone of the link sender (as the PortActor would)
        let mut link_tx = manager.link_sender();

        // Simulate the PortActor confirming an open
        link_tx.try_send(LinkMessage::Opened).ok();

        // Verify the LinkActor receives it
        let msg = handles.link_rx.next().await.unwrap();
        assert!(matches!(msg, LinkMessage::Opened));
    }
}
