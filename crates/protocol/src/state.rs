/// # Link State Machine
///
/// Unified state machine for the single serial link an app holds. It is the
/// single source of truth for connection status and rejects invalid state
/// combinations.
///
/// ## State Transition Diagram
///
/// ```text
///        ┌──────────────────┐
///   ┌───►│  Disconnected    │◄──────────────┐
///   │    └───────┬──────────┘               │
///   │            │ User connect             │ Close
///   │   Open     │                          │ confirmed
///   │   failed   ▼                          │
///   │    ┌──────────────┐           ┌───────┴────────┐
///   └────┤  Connecting  │──────────►│ Disconnecting  │
///        └───────┬──────┘  Cancel / └────────────────┘
///                │         lost             ▲
///                │ Port opened              │ User disconnect /
///                ▼                          │ device lost
///        ┌──────────────┐                   │
///        │  Connected   │───────────────────┘
///        └──────────────┘
/// ```
///
/// ## State Invariants
///
/// - **Disconnected**: No port open, ready for a new connection
/// - **Connecting**: Port opening, waiting for the PortActor confirmation
/// - **Connected**: Port open, reader thread running
/// - **Disconnecting**: Port closing, waiting for close confirmation
///   (event-driven, no arbitrary delays)
///
/// There is no retry or reconnection: a failed open or a lost device always
/// lands back in Disconnected and waits for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LinkState {
    /// No active connection, ready to connect
    Disconnected,

    /// Initiating connection to port
    Connecting,

    /// Successfully connected and operational
    Connected,

    /// Tearing down the connection
    Disconnecting,
}

impl LinkState {
    /// Can the user trigger a disconnect action?
    pub fn can_disconnect(&self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }

    /// Should the button show "Disconnect"?
    pub fn button_shows_disconnect(&self) -> bool {
        self.can_disconnect()
    }

    /// User-facing status text
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Disconnected => "Ready to connect",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Disconnecting => "Disconnecting...",
        }
    }

    /// Validate if transition to new_state is allowed from current state
    pub fn can_transition_to(&self, new_state: LinkState) -> bool {
        use LinkState::*;

        match (self, new_state) {
            // From Disconnected
            (Disconnected, Connecting) => true,   // User connects
            (Disconnected, Disconnected) => true, // Idempotent (no-op)

            // From Connecting
            (Connecting, Connected) => true,     // Port opened
            (Connecting, Disconnected) => true,  // Open failed
            (Connecting, Disconnecting) => true, // Cancel or device lost mid-open

            // From Connected
            (Connected, Disconnecting) => true, // User disconnect or device lost

            // From Disconnecting
            (Disconnecting, Disconnected) => true, // Close confirmed

            // All other transitions are invalid
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(LinkState::Disconnected.can_transition_to(LinkState::Connecting));
        assert!(LinkState::Connecting.can_transition_to(LinkState::Connected));
        assert!(LinkState::Connected.can_transition_to(LinkState::Disconnecting));
        assert!(LinkState::Disconnecting.can_transition_to(LinkState::Disconnected));
        // Open failure falls straight back.
        assert!(LinkState::Connecting.can_transition_to(LinkState::Disconnected));
    }

    #[test]
    fn test_invalid_transitions() {
        // Cannot go directly from Disconnected to Connected
        assert!(!LinkState::Disconnected.can_transition_to(LinkState::Connected));

        // Cannot close the link without passing through Disconnecting
        assert!(!LinkState::Connected.can_transition_to(LinkState::Disconnected));

        // No reconnection from a teardown in progress
        assert!(!LinkState::Disconnecting.can_transition_to(LinkState::Connecting));
    }

    #[test]
    fn test_disconnect_availability() {
        assert!(LinkState::Connected.can_disconnect());
        assert!(LinkState::Connecting.can_disconnect());
        assert!(!LinkState::Disconnected.can_disconnect());
        assert!(!LinkState::Disconnecting.can_disconnect());
    }

    #[test]
    fn test_serialization() {
        let state = LinkState::Connected;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: LinkState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
