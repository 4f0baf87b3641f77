//! WebSocket frame DTOs.
//!
//! Every text frame is `{"event": <name>, "args": [...]}`: an event name plus
//! its positional arguments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A frame as it travels on the wire, in either direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    pub event: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Errors decoding an inbound frame
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("event '{event}' is missing argument {index}")]
    MissingArgument { event: String, index: usize },

    #[error("event '{event}' has an invalid argument: {reason}")]
    InvalidArgument { event: String, reason: String },
}

/// Payload of `createPoll`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollArgs {
    pub room_id: String,
    pub question: String,
    pub options: Vec<String>,
}

/// Payload of `votePoll`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePollArgs {
    pub room_id: String,
    pub option_index: usize,
}

/// Payload of `endPoll`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndPollArgs {
    pub room_id: String,
}

/// Decoded client → server event
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    JoinCall { room_id: String },
    Signal { target: String, payload: Value },
    ChatMessage { text: String, sender_name: String },
    Draw { stroke: Value },
    Clear,
    StartSpeaking { participant_id: String },
    StopSpeaking { participant_id: String },
    GetCode,
    CodeChange { text: String },
    CreatePoll(CreatePollArgs),
    VotePoll(VotePollArgs),
    EndPoll(EndPollArgs),
}

impl ClientEvent {
    /// Decode a text frame
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let frame: EventFrame = serde_json::from_str(text)?;
        Self::try_from(frame)
    }
}

impl TryFrom<EventFrame> for ClientEvent {
    type Error = FrameError;

    fn try_from(frame: EventFrame) -> Result<Self, Self::Error> {
        let mut args = Args::new(&frame.event, frame.args);
        let event = match frame.event.as_str() {
            "join-call" => ClientEvent::JoinCall {
                room_id: args.string(0)?,
            },
            "signal" => ClientEvent::Signal {
                target: args.string(0)?,
                payload: args.value(1)?,
            },
            "chat-message" => ClientEvent::ChatMessage {
                text: args.string(0)?,
                sender_name: args.string(1)?,
            },
            "draw" => ClientEvent::Draw {
                stroke: args.value(0)?,
            },
            "clear" => ClientEvent::Clear,
            "start-speaking" => ClientEvent::StartSpeaking {
                participant_id: args.string(0)?,
            },
            "stop-speaking" => ClientEvent::StopSpeaking {
                participant_id: args.string(0)?,
            },
            "get-code" => ClientEvent::GetCode,
            "code-change" => ClientEvent::CodeChange {
                text: args.string(0)?,
            },
            "createPoll" => ClientEvent::CreatePoll(args.object(0)?),
            "votePoll" => ClientEvent::VotePoll(args.object(0)?),
            "endPoll" => ClientEvent::EndPoll(args.object(0)?),
            other => return Err(FrameError::UnknownEvent(other.to_string())),
        };
        Ok(event)
    }
}

/// Positional argument reader
struct Args<'a> {
    event: &'a str,
    values: Vec<Option<Value>>,
}

impl<'a> Args<'a> {
    fn new(event: &'a str, values: Vec<Value>) -> Self {
        Self {
            event,
            values: values.into_iter().map(Some).collect(),
        }
    }

    fn value(&mut self, index: usize) -> Result<Value, FrameError> {
        self.values
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| FrameError::MissingArgument {
                event: self.event.to_string(),
                index,
            })
    }

    fn string(&mut self, index: usize) -> Result<String, FrameError> {
        match self.value(index)? {
            Value::String(s) => Ok(s),
            other => Err(self.invalid(format!("argument {index} must be a string, got {other}"))),
        }
    }

    fn object<T: serde::de::DeserializeOwned>(&mut self, index: usize) -> Result<T, FrameError> {
        let value = self.value(index)?;
        serde_json::from_value(value).map_err(|e| self.invalid(e.to_string()))
    }

    fn invalid(&self, reason: String) -> FrameError {
        FrameError::InvalidArgument {
            event: self.event.to_string(),
            reason,
        }
    }
}
