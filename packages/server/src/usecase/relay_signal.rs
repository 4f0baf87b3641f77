//! UseCase: シグナリング中継
//!
//! SDP offer/answer や ICE candidate を内容を見ずに宛先の接続へ転送する。
//! 宛先が存在しない場合は黙って破棄する。

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ConnectionId, MessagePusher, ServerEvent};

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// `payload` を `to` に中継する。届いた場合は `true`
    pub async fn execute(&self, from: ConnectionId, to: ConnectionId, payload: Value) -> bool {
        let event = ServerEvent::Signal {
            from: from.clone(),
            payload,
        };
        match self.message_pusher.push_to(&to, &event).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Dropped signal from '{}' to '{}': {}", from, to, e);
                false
            }
        }
    }
}
