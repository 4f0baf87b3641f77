//! MessagePusher trait 定義
//!
//! ユースケースが接続へイベントを届けるためのインターフェース。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::ServerEvent, value_object::ConnectionId};

/// 接続ごとの送信チャンネル（エンコード済みのフレームを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 宛先が存在しない場合は `MessagePushError::ClientNotFound` を返す。
/// `broadcast` は一部の宛先への送信失敗を許容する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
