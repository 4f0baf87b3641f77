//! UseCase: 投票（Poll）
//!
//! Poll は接続の所属 Room ではなく、呼び出し側が指定した Room ID で宛先を決める。
//! 指定された Room にメンバーがいない場合は何もしない。
//!
//! 状態遷移: `NoPoll → create → Active → vote* → Active → end → NoPoll`。
//! Active 中の create は上書きする。

use std::sync::Arc;

use crate::domain::{MessagePusher, Poll, RoomId, RoomRegistry, ServerEvent};

use super::fan_out;

/// 投票のユースケース
pub struct PollUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl PollUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 新しい Poll を作成（既存の Poll は上書き）し、Room 全員に newPoll を配信する
    pub async fn create(
        &self,
        rooms: &mut RoomRegistry,
        room_id: RoomId,
        question: String,
        options: Vec<String>,
    ) -> Option<Poll> {
        let Some(room) = rooms.room_mut(&room_id) else {
            tracing::warn!("Ignoring poll for unknown room '{}'", room_id);
            return None;
        };
        let poll = room.create_poll(Poll::new(question, options)).clone();
        let targets = room.members().to_vec();
        tracing::info!("Poll created in room '{}'", room_id);

        fan_out(
            self.message_pusher.as_ref(),
            targets,
            &ServerEvent::NewPoll(poll.clone()),
        )
        .await;
        Some(poll)
    }

    /// 投票。Poll が存在し、選択肢が範囲内の場合だけ updatePoll を配信する
    pub async fn vote(
        &self,
        rooms: &mut RoomRegistry,
        room_id: RoomId,
        option_index: usize,
    ) -> Option<Poll> {
        let room = rooms.room_mut(&room_id)?;
        let Some(poll) = room.vote(option_index).cloned() else {
            tracing::debug!(
                "Ignoring vote {} in room '{}': no poll or index out of range",
                option_index,
                room_id
            );
            return None;
        };
        let targets = room.members().to_vec();

        fan_out(
            self.message_pusher.as_ref(),
            targets,
            &ServerEvent::UpdatePoll(poll.clone()),
        )
        .await;
        Some(poll)
    }

    /// 最終結果を pollEnded として配信し、Poll を削除する
    pub async fn end(&self, rooms: &mut RoomRegistry, room_id: RoomId) -> Option<Poll> {
        let room = rooms.room_mut(&room_id)?;
        let poll = room.end_poll()?;
        let targets = room.members().to_vec();
        tracing::info!("Poll ended in room '{}'", room_id);

        fan_out(
            self.message_pusher.as_ref(),
            targets,
            &ServerEvent::PollEnded(poll.clone()),
        )
        .await;
        Some(poll)
    }
}
