//! Room entity and its per-room sub-states.
//!
//! A [`Room`] owns every piece of per-room state (membership, chat log, shared
//! document, speaking ledger and poll), so dropping the room drops all of it.

use std::collections::BTreeMap;

use serde::Serialize;

use super::value_object::{ConnectionId, ParticipantId, RoomId, Timestamp};

/// Initial content of a room's shared document
pub const DOCUMENT_PLACEHOLDER: &str =
    "// Start coding together...\nfunction hello() {\n  console.log('Hello, Meetly!');\n}";

/// A chat message, immutable once appended to a room's log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_name: String,
    pub text: String,
    pub origin: ConnectionId,
}

impl ChatMessage {
    pub fn new(sender_name: String, text: String, origin: ConnectionId) -> Self {
        Self {
            sender_name,
            text,
            origin,
        }
    }
}

/// Accumulated speaking time of one participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeakingRecord {
    /// Accumulated duration in milliseconds
    pub total: i64,
    /// Start of the open interval, `None` when not speaking
    pub start: Option<Timestamp>,
}

impl SpeakingRecord {
    pub fn is_speaking(&self) -> bool {
        self.start.is_some()
    }
}

/// Per-room speaking-time ledger keyed by participant id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakingLedger {
    records: BTreeMap<ParticipantId, SpeakingRecord>,
}

impl SpeakingLedger {
    /// Open a speaking interval for `participant`.
    ///
    /// Creates the record on first use. A start while an interval is already
    /// open keeps the original start. Returns `true` if an interval was opened.
    pub fn start(&mut self, participant: ParticipantId, now: Timestamp) -> bool {
        let record = self.records.entry(participant).or_default();
        if record.is_speaking() {
            return false;
        }
        record.start = Some(now);
        true
    }

    /// Close the open interval of `participant` and accumulate its duration.
    ///
    /// Returns `true` if the record changed. Unknown participants and records
    /// without an open interval are left untouched.
    pub fn stop(&mut self, participant: &ParticipantId, now: Timestamp) -> bool {
        let Some(record) = self.records.get_mut(participant) else {
            return false;
        };
        let Some(start) = record.start.take() else {
            return false;
        };
        record.total += now.millis_since(start);
        true
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.records.contains_key(participant)
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<&SpeakingRecord> {
        self.records.get(participant)
    }

    pub fn records(&self) -> &BTreeMap<ParticipantId, SpeakingRecord> {
        &self.records
    }
}

/// A live poll: question, options and a parallel list of vote counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
    pub votes: Vec<u32>,
}

impl Poll {
    pub fn new(question: String, options: Vec<String>) -> Self {
        let votes = vec![0; options.len()];
        Self {
            question,
            options,
            votes,
        }
    }

    /// Count one vote for `option_index`; returns `false` when out of range.
    pub fn vote(&mut self, option_index: usize) -> bool {
        match self.votes.get_mut(option_index) {
            Some(count) => {
                *count = count.saturating_add(1);
                true
            }
            None => false,
        }
    }
}

/// A meeting room and all of its shared state
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    members: Vec<ConnectionId>,
    chat_log: Vec<ChatMessage>,
    document: String,
    ledger: SpeakingLedger,
    poll: Option<Poll>,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            members: Vec::new(),
            chat_log: Vec::new(),
            document: DOCUMENT_PLACEHOLDER.to_string(),
            ledger: SpeakingLedger::default(),
            poll: None,
        }
    }

    /// Members in join order
    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    /// Every member except `exclude`, in join order
    pub fn others(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|id| *id != exclude)
            .cloned()
            .collect()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(super) fn add_member(&mut self, connection_id: ConnectionId) {
        if !self.contains(&connection_id) {
            self.members.push(connection_id);
        }
    }

    pub(super) fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|id| id != connection_id);
        self.members.len() != before
    }

    pub fn post_message(&mut self, message: ChatMessage) {
        self.chat_log.push(message);
    }

    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat_log
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Replace the shared document wholesale (last writer wins)
    pub fn replace_document(&mut self, text: String) {
        self.document = text;
    }

    pub fn ledger(&self) -> &SpeakingLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut SpeakingLedger {
        &mut self.ledger
    }

    pub fn poll(&self) -> Option<&Poll> {
        self.poll.as_ref()
    }

    /// Install a new poll, overwriting any live one
    pub fn create_poll(&mut self, poll: Poll) -> &Poll {
        self.poll.insert(poll)
    }

    /// Count a vote on the live poll; `None` when there is no poll or the
    /// index is out of range.
    pub fn vote(&mut self, option_index: usize) -> Option<&Poll> {
        let poll = self.poll.as_mut()?;
        if poll.vote(option_index) {
            Some(&*poll)
        } else {
            None
        }
    }

    /// Remove and return the live poll
    pub fn end_poll(&mut self) -> Option<Poll> {
        self.poll.take()
    }
}
