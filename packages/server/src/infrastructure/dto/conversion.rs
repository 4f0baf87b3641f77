//! Conversion logic between DTOs and domain types.

use meetly_shared::time::timestamp_to_rfc3339;
use serde_json::json;

use crate::{
    domain::{
        ConnectionId, ParticipantId, Poll, RoomId, RoomSnapshot, ServerEvent, Timestamp,
        ValueObjectError,
    },
    infrastructure::dto::{
        http::{MemberDetailDto, PollDto, RoomDetailDto, RoomSummaryDto, SpeakingTimeDto},
        websocket::{ClientEvent, EventFrame},
    },
    usecase::Command,
};

// ========================================
// Inbound frame → Command
// ========================================

impl ClientEvent {
    /// Turn a decoded frame from `connection_id` into a coordinator command
    pub fn into_command(self, connection_id: ConnectionId) -> Result<Command, ValueObjectError> {
        let command = match self {
            ClientEvent::JoinCall { room_id } => Command::Join {
                connection_id,
                room_id: RoomId::new(room_id)?,
            },
            ClientEvent::Signal { target, payload } => Command::Signal {
                from: connection_id,
                to: ConnectionId::new(target)?,
                payload,
            },
            ClientEvent::ChatMessage { text, sender_name } => Command::Chat {
                connection_id,
                text,
                sender_name,
            },
            ClientEvent::Draw { stroke } => Command::Draw {
                connection_id,
                stroke,
            },
            ClientEvent::Clear => Command::Clear { connection_id },
            ClientEvent::StartSpeaking { participant_id } => Command::StartSpeaking {
                connection_id,
                participant_id: ParticipantId::new(participant_id)?,
            },
            ClientEvent::StopSpeaking { participant_id } => Command::StopSpeaking {
                connection_id,
                participant_id: ParticipantId::new(participant_id)?,
            },
            ClientEvent::GetCode => Command::GetCode { connection_id },
            ClientEvent::CodeChange { text } => Command::CodeChange {
                connection_id,
                text,
            },
            ClientEvent::CreatePoll(args) => Command::CreatePoll {
                room_id: RoomId::new(args.room_id)?,
                question: args.question,
                options: args.options,
            },
            ClientEvent::VotePoll(args) => Command::VotePoll {
                room_id: RoomId::new(args.room_id)?,
                option_index: args.option_index,
            },
            ClientEvent::EndPoll(args) => Command::EndPoll {
                room_id: RoomId::new(args.room_id)?,
            },
        };
        Ok(command)
    }
}

// ========================================
// ServerEvent → Outbound frame
// ========================================

impl TryFrom<&ServerEvent> for EventFrame {
    type Error = serde_json::Error;

    fn try_from(event: &ServerEvent) -> Result<Self, Self::Error> {
        let args = match event {
            ServerEvent::Connected { connection_id } => vec![json!(connection_id)],
            ServerEvent::UserJoined { joining, members } => {
                vec![json!(joining), serde_json::to_value(members)?]
            }
            ServerEvent::UserLeft { departing } => vec![json!(departing)],
            ServerEvent::Signal { from, payload } => vec![json!(from), payload.clone()],
            ServerEvent::ChatMessage {
                text,
                sender_name,
                origin,
            } => vec![json!(text), json!(sender_name), json!(origin)],
            ServerEvent::Draw { stroke } => vec![stroke.clone()],
            ServerEvent::Clear => Vec::new(),
            ServerEvent::UpdateTimes { table } => vec![serde_json::to_value(table)?],
            ServerEvent::InitCode { text } | ServerEvent::UpdateCode { text } => {
                vec![json!(text)]
            }
            ServerEvent::NewPoll(poll)
            | ServerEvent::UpdatePoll(poll)
            | ServerEvent::PollEnded(poll) => vec![serde_json::to_value(poll)?],
        };
        Ok(EventFrame {
            event: event.name().to_string(),
            args,
        })
    }
}

/// Encode an event as a JSON text frame
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    let frame = EventFrame::try_from(event)?;
    serde_json::to_string(&frame)
}

// ========================================
// Snapshot → HTTP DTO
// ========================================

fn rfc3339(timestamp: Timestamp) -> Option<String> {
    timestamp_to_rfc3339(timestamp.value())
}

impl From<Poll> for PollDto {
    fn from(poll: Poll) -> Self {
        Self {
            question: poll.question,
            options: poll.options,
            votes: poll.votes,
        }
    }
}

impl From<&RoomSnapshot> for RoomSummaryDto {
    fn from(room: &RoomSnapshot) -> Self {
        Self {
            id: room.id.to_string(),
            members: room.members.iter().map(|m| m.id.to_string()).collect(),
            member_count: room.members.len(),
            chat_messages: room.chat_messages,
            has_poll: room.poll.is_some(),
            created_at: rfc3339(room.created_at),
        }
    }
}

impl From<RoomSnapshot> for RoomDetailDto {
    fn from(room: RoomSnapshot) -> Self {
        Self {
            id: room.id.into_string(),
            created_at: rfc3339(room.created_at),
            members: room
                .members
                .into_iter()
                .map(|m| MemberDetailDto {
                    connection_id: m.id.into_string(),
                    joined_at: m.joined_at.and_then(rfc3339),
                })
                .collect(),
            chat_messages: room.chat_messages,
            speaking_times: room
                .ledger
                .into_iter()
                .map(|(participant, record)| {
                    (
                        participant.into_string(),
                        SpeakingTimeDto {
                            total_ms: record.total,
                            speaking_since: record.start.and_then(rfc3339),
                        },
                    )
                })
                .collect(),
            poll: room.poll.map(PollDto::from),
        }
    }
}
