//! Real-time meeting room coordination server.
//!
//! Groups WebSocket connections into named rooms and relays WebRTC signaling,
//! chat, whiteboard strokes, a shared code document, speaking-time ledgers and
//! polls between the members of each room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
