//! Domain layer: room state, value objects and the seams the use cases depend on.
//!
//! Everything here is synchronous and free of I/O. Use cases mutate the
//! [`RoomRegistry`] and hand the resulting [`ServerEvent`]s to a [`MessagePusher`].

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod registry;
pub mod value_object;

pub use entity::{ChatMessage, DOCUMENT_PLACEHOLDER, Poll, Room, SpeakingLedger, SpeakingRecord};
pub use error::{MessagePushError, ValueObjectError};
pub use event::ServerEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::{JoinOutcome, LeaveOutcome, MemberSnapshot, RoomRegistry, RoomSnapshot};
pub use value_object::{ConnectionId, ParticipantId, RoomId, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
