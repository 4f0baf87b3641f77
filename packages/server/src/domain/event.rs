//! Outbound events pushed from the server to connections.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{
    entity::{Poll, SpeakingRecord},
    value_object::{ConnectionId, ParticipantId},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Tells a fresh connection its transport-assigned id
    Connected { connection_id: ConnectionId },
    UserJoined {
        joining: ConnectionId,
        members: Vec<ConnectionId>,
    },
    UserLeft { departing: ConnectionId },
    /// Opaque offer/answer/ICE payload, never inspected
    Signal { from: ConnectionId, payload: Value },
    ChatMessage {
        text: String,
        sender_name: String,
        origin: ConnectionId,
    },
    Draw { stroke: Value },
    Clear,
    UpdateTimes {
        table: BTreeMap<ParticipantId, SpeakingRecord>,
    },
    InitCode { text: String },
    UpdateCode { text: String },
    NewPoll(Poll),
    UpdatePoll(Poll),
    PollEnded(Poll),
}

impl ServerEvent {
    /// Event name on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected { .. } => "connected",
            ServerEvent::UserJoined { .. } => "user-joined",
            ServerEvent::UserLeft { .. } => "user-left",
            ServerEvent::Signal { .. } => "signal",
            ServerEvent::ChatMessage { .. } => "chat-message",
            ServerEvent::Draw { .. } => "draw",
            ServerEvent::Clear => "clear",
            ServerEvent::UpdateTimes { .. } => "update-times",
            ServerEvent::InitCode { .. } => "init-code",
            ServerEvent::UpdateCode { .. } => "update-code",
            ServerEvent::NewPoll(_) => "newPoll",
            ServerEvent::UpdatePoll(_) => "updatePoll",
            ServerEvent::PollEnded(_) => "pollEnded",
        }
    }
}
