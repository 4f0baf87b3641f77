//! Data Transfer Objects (DTOs) for the signaling server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event frames
//! - `http`: diagnostics HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
