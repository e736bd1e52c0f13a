//! # Link Actors
//!
//! Actors managing the single serial link behind a telemetry app.
//!
//! ## Actors
//!
//! - **LinkActor**: Owns the connection state machine and coordinates teardown
//! - **PortActor**: Owns the serial port handle and its reader thread
//!
//! Plus `detect`, the port enumeration and auto-detection helpers.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod detect;
pub mod link_actor;
pub mod port_actor;

pub use link_actor::LinkActor;
pub use port_actor::PortActor;
