//! # Protocol
//!
//! Type-safe message definitions for the serial link actor system.
//!
//! This crate defines the messages exchanged between the UI shells and the
//! link actors, the link state machine, and the shared error type. It has no
//! dependency on any GUI framework or on the serial backend, so everything
//! here is testable as plain Rust.
//!
//! ## Message flow
//!
//! ```text
//! UI → UiCommand → LinkActor ⇄ PortActor
//!                      ↓
//!                  UiEvent → UI
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod errors;
pub mod messages;
pub mod state;

pub use errors::ActorError;
pub use messages::{FlowControl, ParityMode, PortInfo, SerialSettings, UiCommand, UiEvent};
pub use state::LinkState;
