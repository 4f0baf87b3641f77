//! HTTP API response DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: Vec<String>,
    pub member_count: usize,
    pub chat_messages: usize,
    pub has_poll: bool,
    pub created_at: Option<String>,
}

/// Member entry in a room detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub connection_id: String,
    pub joined_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakingTimeDto {
    pub total_ms: i64,
    pub speaking_since: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollDto {
    pub question: String,
    pub options: Vec<String>,
    pub votes: Vec<u32>,
}

/// Room detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub created_at: Option<String>,
    pub members: Vec<MemberDetailDto>,
    pub chat_messages: usize,
    pub speaking_times: BTreeMap<String, SpeakingTimeDto>,
    pub poll: Option<PollDto>,
}
