use actor_runtime::{actor_debug, actor_warn, Actor, LinkMessage, PortMessage};
use futures_channel::mpsc;
use protocol::{ActorError, LinkState, UiCommand, UiEvent};

use crate::detect;

/// LinkActor owns the connection state machine and coordinates the PortActor
///
/// Responsibilities:
/// - Maintain the single source of truth for link state
/// - Validate and execute state transitions
/// - Route commands to the PortActor
/// - Emit state change events to UI
///
/// Key coordination pattern is the event-driven disconnect:
/// Disconnecting → (PortActor confirms Closed) → Disconnected. A device-level
/// read failure takes the same path; there is no retry or reconnection.
///
/// For the transition table and invariants see `protocol/src/state.rs`.
pub struct LinkActor {
    state: LinkState,
    port_tx: mpsc::Sender<PortMessage>,
    event_tx: mpsc::Sender<UiEvent>,
}

impl LinkActor {
    pub fn new(port_tx: mpsc::Sender<PortMessage>, event_tx: mpsc::Sender<UiEvent>) -> Self {
        Self {
            state: LinkState::Disconnected,
            port_tx,
            event_tx,
        }
    }

    /// Current state, exposed for tests.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Send a CRITICAL message that must succeed for system correctness
    ///
    /// If the channel is closed, the PortActor has crashed or shut down.
    /// If the channel is full, the system is overloaded.
    /// Both cases are fatal and should propagate as errors.
    fn send_critical_port(&self, msg: PortMessage) -> Result<(), ActorError> {
        self.port_tx.clone().try_send(msg).map_err(|e| {
            if e.is_disconnected() {
                ActorError::ChannelClosed("PortActor has shut down".into())
            } else {
                ActorError::Other("PortActor channel overloaded".into())
            }
        })
    }

    /// Send a UI event. Failures are logged but don't propagate; these are
    /// non-critical for core FSM logic.
    fn send_ui_event(&self, event: UiEvent) {
        if let Err(e) = self.event_tx.clone().try_send(event) {
            actor_warn!("LinkActor: UI event dropped: {:?}", e);
        }
    }

    /// Attempt to transition to a new state
    ///
    /// Returns Ok if transition is valid, Err otherwise
    fn transition(&mut self, new_state: LinkState) -> Result<(), ActorError> {
        if !self.state.can_transition_to(new_state) {
            return Err(ActorError::InvalidTransition(format!(
                "{:?} → {:?}",
                self.state, new_state
            )));
        }

        #[cfg(debug_assertions)]
        let old_state = self.state;

        self.state = new_state;

        // Notify UI of state change (non-critical)
        self.send_ui_event(UiEvent::StateChanged { state: new_state });

        actor_debug!("LinkActor: {:?} → {:?}", old_state, new_state);

        Ok(())
    }

    async fn handle_connect(
        &mut self,
        port: protocol::PortInfo,
        settings: protocol::SerialSettings,
        greeting: Option<Vec<u8>>,
    ) -> Result<(), ActorError> {
        // Validate current state
        if self.state != LinkState::Disconnected {
            return Err(ActorError::UnexpectedMessage {
                state: format!("{:?}", self.state),
                message: "Connect".into(),
            });
        }

        self.transition(LinkState::Connecting)?;

        // CRITICAL: the PortActor must receive the open request
        self.send_critical_port(PortMessage::Open {
            port,
            settings,
            greeting,
        })?;

        Ok(())
    }

    async fn handle_disconnect(&mut self) -> Result<(), ActorError> {
        if !self.state.can_disconnect() {
            return Err(ActorError::UnexpectedMessage {
                state: format!("{:?}", self.state),
                message: "Disconnect".into(),
            });
        }

        self.transition(LinkState::Disconnecting)?;

        // Tell PortActor to close (CRITICAL - must succeed for resource cleanup)
        self.send_critical_port(PortMessage::Close)?;

        // Event-driven coordination: the PortActor sends Closed when the
        // close is complete, and only then do we reach Disconnected.

        Ok(())
    }

    async fn handle_refresh_ports(&mut self) -> Result<(), ActorError> {
        let ports = detect::list_ports()?;
        actor_debug!("LinkActor: enumerated {} port(s)", ports.len());
        self.send_ui_event(UiEvent::PortsListed { ports });
        Ok(())
    }

    async fn handle_opened(&mut self) -> Result<(), ActorError> {
        if self.state != LinkState::Connecting {
            // Open confirmed after the user already started tearing the
            // link down. The PortActor will receive the pending Close.
            actor_debug!("LinkActor: Ignoring Opened in {:?} state", self.state);
            return Ok(());
        }

        self.transition(LinkState::Connected)?;
        Ok(())
    }

    async fn handle_open_failed(&mut self, reason: String) -> Result<(), ActorError> {
        // Emit error event (non-critical UI notification)
        self.send_ui_event(UiEvent::Error {
            message: format!("Connection failed: {}", reason),
        });

        if self.state == LinkState::Connecting {
            // Return to disconnected; no retry
            self.transition(LinkState::Disconnected)?;
        }

        Ok(())
    }

    async fn handle_lost(&mut self) -> Result<(), ActorError> {
        if !self.state.can_disconnect() {
            actor_debug!("LinkActor: Ignoring Lost in {:?} state", self.state);
            return Ok(());
        }

        self.send_ui_event(UiEvent::Error {
            message: "Connection lost: device removed or read failed".into(),
        });

        // Close the port cleanly before transitioning (CRITICAL)
        self.transition(LinkState::Disconnecting)?;
        self.send_critical_port(PortMessage::Close)?;

        Ok(())
    }

    async fn handle_closed(&mut self) -> Result<(), ActorError> {
        // PortActor has confirmed the port is fully closed
        if self.state == LinkState::Disconnecting {
            self.transition(LinkState::Disconnected)?;
            actor_debug!("LinkActor: Port close confirmed, transitioned to Disconnected");
        } else {
            actor_debug!("LinkActor: Ignoring Closed in {:?} state", self.state);
        }
        Ok(())
    }
}

impl Actor for LinkActor {
    type Message = LinkMessage;

    fn name(&self) -> &'static str {
        "LinkActor"
    }

    async fn handle(&mut self, msg: LinkMessage) -> Result<(), ActorError> {
        match msg {
            LinkMessage::UiCommand(cmd) => match cmd {
                UiCommand::Connect {
                    port,
                    settings,
                    greeting,
                } => self.handle_connect(port, settings, greeting).await?,
                UiCommand::Disconnect => self.handle_disconnect().await?,
                UiCommand::RefreshPorts => self.handle_refresh_ports().await?,
                UiCommand::WriteData { .. } => {
                    // Routed directly to the PortActor by the ChannelManager;
                    // not handled by the state machine.
                }
            },
            LinkMessage::Opened => self.handle_opened().await?,
            LinkMessage::OpenFailed { reason } => self.handle_open_failed(reason).await?,
            LinkMessage::Lost => self.handle_lost().await?,
            LinkMessage::Closed => self.handle_closed().await?,
        }
        Ok(())
    }
}
