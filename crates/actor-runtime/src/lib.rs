//! # Actor Runtime
//!
//! Runtime infrastructure for the serial link actor system.
//!
//! This crate defines:
//! - **Actor trait**: Base trait for all actors with lifecycle methods
//! - **Channel management**: Type-safe message routing between actors
//! - **Ticker**: Cancellable periodic tick source for countdown displays
//!
//! ## Architecture
//!
//! The actor runtime follows these principles:
//! - **Zero shared state**: Each actor owns its data
//! - **Message passing**: Actors communicate via typed messages
//! - **Sequential processing**: Messages are handled one at a time
//! - **Failure isolation**: Actor errors don't crash the system
//!
//! ## Example
//!
//! ```ignore
//! use actor_runtime::ChannelManager;
//!
//! // Create channel infrastructure
//! let (manager, handles) = ChannelManager::new();
//!
//! // Create and spawn actors (within a tokio runtime)
//! let link_actor = LinkActor::new(/* ... */);
//! runtime.spawn(link_actor.run(handles.link_rx, handles.event_tx.clone()));
//!
//! // Send commands from UI
//! manager.send_command(UiCommand::RefreshPorts);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod actor;
pub mod channels;
pub mod logging;
pub mod ticker;

pub use actor::Actor;
pub use channels::{ActorHandles, ChannelManager, LinkMessage, PortMessage};
pub use ticker::{spawn_ticker, TickerHandle};
