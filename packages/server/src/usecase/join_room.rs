//! UseCase: Room 参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 全メンバー（本人を含む）への user-joined 通知と、本人へのチャット履歴の再送
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者、既存 Room への参加
//! - エッジケース：同じ Room への再参加、別の Room への移動

use std::sync::Arc;

use meetly_shared::time::Clock;

use crate::domain::{
    ConnectionId, JoinOutcome, MessagePusher, RoomId, RoomRegistry, ServerEvent, Timestamp,
};

use super::{disconnect_participant::announce_departure, fan_out};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// Room 参加を実行
    ///
    /// # Returns
    ///
    /// * `Some(JoinOutcome)` - 参加した（別 Room から移動した場合は `previous` に退出結果）
    /// * `None` - すでに同じ Room のメンバーだった
    pub async fn execute(
        &self,
        rooms: &mut RoomRegistry,
        connection_id: ConnectionId,
        room_id: RoomId,
    ) -> Option<JoinOutcome> {
        let now = Timestamp::new(self.clock.now_millis());
        let Some(outcome) = rooms.join(connection_id.clone(), room_id.clone(), now) else {
            tracing::debug!(
                "Connection '{}' is already in room '{}', ignoring join",
                connection_id,
                room_id
            );
            return None;
        };

        if let Some(previous) = &outcome.previous {
            announce_departure(self.message_pusher.as_ref(), &connection_id, previous).await;
        }

        // 1. 本人を含む全メンバーに user-joined（全メンバーリスト付き）
        let joined = ServerEvent::UserJoined {
            joining: connection_id.clone(),
            members: outcome.members.clone(),
        };
        fan_out(
            self.message_pusher.as_ref(),
            outcome.members.clone(),
            &joined,
        )
        .await;

        // 2. チャット履歴を本人にだけ順番に再送
        for message in &outcome.history {
            let replay = ServerEvent::ChatMessage {
                text: message.text.clone(),
                sender_name: message.sender_name.clone(),
                origin: message.origin.clone(),
            };
            if let Err(e) = self.message_pusher.push_to(&connection_id, &replay).await {
                tracing::warn!("Failed to replay chat history to '{}': {}", connection_id, e);
                break;
            }
        }

        tracing::info!(
            "Connection '{}' joined room '{}' ({} members)",
            connection_id,
            room_id,
            outcome.members.len()
        );

        Some(outcome)
    }
}
