//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `ServerEvent` を JSON フレームにエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent},
    infrastructure::dto::conversion::encode_event,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: connection id
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
        encode_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
        clients.insert(client_id, sender);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(client_id) else {
            return Err(MessagePushError::ClientNotFound(client_id.to_string()));
        };
        sender
            .send(Self::encode(event)?)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to client '{}'", event.name(), client_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(frame.clone()) {
                    tracing::warn!("Failed to push '{}' to client '{}': {}", event.name(), target, e);
                }
            } else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続へエンコード済みフレームを送信
    // - broadcast: 複数接続への送信（一部の宛先が存在しなくても成功）
    // - 存在しない接続への push_to はエラー
    // ========================================

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn parse(frame: Option<String>) -> Value {
        serde_json::from_str(&frame.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_sends_encoded_frame() {
        // テスト項目: 特定の接続にイベントが JSON フレームとして届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;

        // when (操作):
        let result = pusher
            .push_to(&conn("alice"), &ServerEvent::InitCode { text: "x".into() })
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            parse(rx.recv().await),
            json!({"event": "init-code", "args": ["x"]})
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しない接続への送信は ClientNotFound を返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let result = pusher.push_to(&conn("ghost"), &ServerEvent::Clear).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_fails() {
        // テスト項目: 受信側が閉じた接続への送信は PushFailed を返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&conn("alice"), &ServerEvent::Clear).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の宛先が存在しなくてもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx1).await;
        pusher.register_client(conn("bob"), tx2).await;

        // when (操作):
        let event = ServerEvent::UserLeft {
            departing: conn("carol"),
        };
        let result = pusher
            .broadcast(vec![conn("alice"), conn("ghost"), conn("bob")], &event)
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected = json!({"event": "user-left", "args": ["carol"]});
        assert_eq!(parse(rx1.recv().await), expected);
        assert_eq!(parse(rx2.recv().await), expected);
    }

    #[tokio::test]
    async fn test_unregistered_client_no_longer_receives() {
        // テスト項目: 登録解除した接続にはもう送信できない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;

        // when (操作):
        pusher.unregister_client(&conn("alice")).await;
        let result = pusher.push_to(&conn("alice"), &ServerEvent::Clear).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }
}
