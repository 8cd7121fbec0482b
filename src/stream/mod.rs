//! Streaming session protocol
//!
//! This module provides the message-oriented streaming surface:
//! - typed client/server message enums
//! - the per-connection `StreamSessionHandler` state machine
//! - the WebSocket transport that feeds it

mod handler;
mod messages;
mod ws;

pub use handler::{HandlerState, StreamSessionHandler};
pub use messages::{ClientMessage, ServerMessage, StartSessionMetadata, WireChunk};
pub use ws::ws_upgrade;
