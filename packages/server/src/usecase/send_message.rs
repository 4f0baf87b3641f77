//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者を含む Room の全メンバーへのブロードキャストと履歴への追加
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：Room に参加していない接続からの送信（何もしない）
//! - エッジケース：別の Room には届かない

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, MessagePusher, RoomRegistry, ServerEvent};

use super::fan_out;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Some(Vec<ConnectionId>)` - ブロードキャスト対象（送信者を含む）
    /// * `None` - 送信者が Room に参加していない
    pub async fn execute(
        &self,
        rooms: &mut RoomRegistry,
        connection_id: ConnectionId,
        sender_name: String,
        text: String,
    ) -> Option<Vec<ConnectionId>> {
        let Some(room) = rooms.room_of_mut(&connection_id) else {
            tracing::debug!("Ignoring chat from '{}' outside any room", connection_id);
            return None;
        };

        room.post_message(ChatMessage::new(
            sender_name.clone(),
            text.clone(),
            connection_id.clone(),
        ));
        let targets = room.members().to_vec();
        tracing::debug!(
            "Chat in room '{}' from '{}' ({})",
            room.id,
            connection_id,
            sender_name
        );

        let event = ServerEvent::ChatMessage {
            text,
            sender_name,
            origin: connection_id,
        };
        fan_out(self.message_pusher.as_ref(), targets.clone(), &event).await;

        Some(targets)
    }
}
