//! Value objects identifying connections, rooms and participants.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                if value.trim().is_empty() {
                    return Err(ValueObjectError::Empty($label));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Transport-assigned identity of one live WebSocket connection.
    ConnectionId,
    "connection id"
);

string_id!(
    /// Caller-supplied room name (typically a meeting URL or token).
    RoomId,
    "room id"
);

string_id!(
    /// Caller-supplied participant key used by the speaking-time ledger.
    ///
    /// Not necessarily equal to a [`ConnectionId`].
    ParticipantId,
    "participant id"
);

impl ConnectionId {
    /// Assign a fresh connection id (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, never negative.
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).max(0)
    }
}
