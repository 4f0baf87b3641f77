//! Room Registry, connection→room index and Presence Tracker.
//!
//! The registry is the single owner of all room state. A room is created by
//! the first join and dropped, together with its chat log, shared document,
//! speaking ledger and poll, as soon as its last member leaves. The reverse
//! index from connection to room is updated in the same call as the
//! membership list, so lookups never need to scan rooms.

use std::collections::{BTreeMap, HashMap};

use super::{
    entity::{ChatMessage, Poll, Room, SpeakingRecord},
    value_object::{ConnectionId, ParticipantId, RoomId, Timestamp},
};

/// Result of a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    /// Full membership list after the join, in join order
    pub members: Vec<ConnectionId>,
    /// Chat history to replay to the joiner only
    pub history: Vec<ChatMessage>,
    /// Set when the connection had to leave another room first
    pub previous: Option<LeaveOutcome>,
}

/// Result of removing a connection from its room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    /// Members still in the room, in join order
    pub remaining: Vec<ConnectionId>,
    /// `true` when the room was emptied and all of its state purged
    pub room_closed: bool,
    /// When the connection joined, from the Presence Tracker
    pub joined_at: Option<Timestamp>,
}

/// Read-only view of one member used by diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub id: ConnectionId,
    pub joined_at: Option<Timestamp>,
}

/// Read-only view of one room used by diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub created_at: Timestamp,
    pub members: Vec<MemberSnapshot>,
    pub chat_messages: usize,
    pub ledger: BTreeMap<ParticipantId, SpeakingRecord>,
    pub poll: Option<Poll>,
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    /// connection id → room id
    membership: HashMap<ConnectionId, RoomId>,
    /// connection id → join timestamp
    presence: HashMap<ConnectionId, Timestamp>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection_id` to `room_id`, creating the room if needed.
    ///
    /// Returns `None` when the connection is already a member of `room_id`.
    /// A connection that is in another room leaves it first; the returned
    /// outcome carries that departure in `previous`.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        room_id: RoomId,
        now: Timestamp,
    ) -> Option<JoinOutcome> {
        if self.membership.get(&connection_id) == Some(&room_id) {
            return None;
        }
        let previous = self.leave(&connection_id);

        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), now));
        room.add_member(connection_id.clone());
        let members = room.members().to_vec();
        let history = room.chat_log().to_vec();

        self.membership.insert(connection_id.clone(), room_id.clone());
        self.presence.insert(connection_id, now);

        Some(JoinOutcome {
            room_id,
            members,
            history,
            previous,
        })
    }

    /// Remove `connection_id` from its room.
    ///
    /// Returns `None` when the connection never joined a room. When the room
    /// becomes empty it is removed along with all of its state.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Option<LeaveOutcome> {
        let room_id = self.membership.remove(connection_id)?;
        let joined_at = self.presence.remove(connection_id);

        let room = self.rooms.get_mut(&room_id)?;
        room.remove_member(connection_id);
        let remaining = room.members().to_vec();
        let room_closed = room.is_empty();
        if room_closed {
            self.rooms.remove(&room_id);
        }

        Some(LeaveOutcome {
            room_id,
            remaining,
            room_closed,
            joined_at,
        })
    }

    /// Room id the connection currently belongs to
    pub fn room_id_of(&self, connection_id: &ConnectionId) -> Option<&RoomId> {
        self.membership.get(connection_id)
    }

    /// Room the connection currently belongs to
    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<&Room> {
        self.room_id_of(connection_id)
            .and_then(|room_id| self.rooms.get(room_id))
    }

    pub fn room_of_mut(&mut self, connection_id: &ConnectionId) -> Option<&mut Room> {
        let room_id = self.membership.get(connection_id)?;
        self.rooms.get_mut(room_id)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn room_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    pub fn joined_at(&self, connection_id: &ConnectionId) -> Option<Timestamp> {
        self.presence.get(connection_id).copied()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Snapshot of every room, ordered by room id
    pub fn snapshot(&self) -> Vec<RoomSnapshot> {
        let mut rooms: Vec<RoomSnapshot> = self
            .rooms
            .values()
            .map(|room| RoomSnapshot {
                id: room.id.clone(),
                created_at: room.created_at,
                members: room
                    .members()
                    .iter()
                    .map(|id| MemberSnapshot {
                        id: id.clone(),
                        joined_at: self.joined_at(id),
                    })
                    .collect(),
                chat_messages: room.chat_log().len(),
                ledger: room.ledger().records().clone(),
                poll: room.poll().cloned(),
            })
            .collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}
