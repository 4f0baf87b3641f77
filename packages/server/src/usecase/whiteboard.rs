//! UseCase: ホワイトボード中継
//!
//! ストロークと clear を編集者以外の Room メンバーにそのまま中継する。
//! サーバー側にキャンバスの状態は持たない（参加時の再送もしない）。

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ConnectionId, MessagePusher, RoomRegistry, ServerEvent};

use super::fan_out;

pub struct WhiteboardUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl WhiteboardUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn draw(
        &self,
        rooms: &RoomRegistry,
        connection_id: ConnectionId,
        stroke: Value,
    ) -> Option<Vec<ConnectionId>> {
        self.relay(rooms, &connection_id, ServerEvent::Draw { stroke })
            .await
    }

    pub async fn clear(
        &self,
        rooms: &RoomRegistry,
        connection_id: ConnectionId,
    ) -> Option<Vec<ConnectionId>> {
        self.relay(rooms, &connection_id, ServerEvent::Clear).await
    }

    async fn relay(
        &self,
        rooms: &RoomRegistry,
        connection_id: &ConnectionId,
        event: ServerEvent,
    ) -> Option<Vec<ConnectionId>> {
        let targets = rooms.room_of(connection_id)?.others(connection_id);
        fan_out(self.message_pusher.as_ref(), targets.clone(), &event).await;
        Some(targets)
    }
}
