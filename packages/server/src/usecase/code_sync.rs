//! UseCase: 共有コードエディタ
//!
//! Room ごとに 1 つのテキストを保持し、編集のたびに全体を上書きする（last writer wins）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomRegistry, ServerEvent};

use super::fan_out;

/// 共有ドキュメントのユースケース
pub struct CodeSyncUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl CodeSyncUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 現在のドキュメントを要求者にだけ送る
    pub async fn get_current(
        &self,
        rooms: &RoomRegistry,
        connection_id: ConnectionId,
    ) -> Option<String> {
        let room = rooms.room_of(&connection_id)?;
        let text = room.document().to_string();

        let event = ServerEvent::InitCode { text: text.clone() };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &event).await {
            tracing::warn!("Failed to send document to '{}': {}", connection_id, e);
        }
        Some(text)
    }

    /// ドキュメントを `text` で上書きし、編集者以外のメンバーに配信する
    pub async fn apply_edit(
        &self,
        rooms: &mut RoomRegistry,
        connection_id: ConnectionId,
        text: String,
    ) -> Option<Vec<ConnectionId>> {
        let room = rooms.room_of_mut(&connection_id)?;
        room.replace_document(text.clone());
        let targets = room.others(&connection_id);

        fan_out(
            self.message_pusher.as_ref(),
            targets.clone(),
            &ServerEvent::UpdateCode { text },
        )
        .await;
        Some(targets)
    }
}
