//! UseCase: 接続登録処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, ServerEvent};

/// 接続登録のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 送信チャンネルを登録し、割り当てた接続 ID を本人に通知する
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let event = ServerEvent::Connected {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &event).await {
            tracing::warn!("Failed to greet '{}': {}", connection_id, e);
        }
    }
}
