//! Shared application state.

use crate::{config::HeartbeatConfig, usecase::CoordinatorHandle};

/// Shared application state
pub struct AppState {
    /// Coordinator（ルーム状態を所有するタスクへのコマンドキュー）
    pub coordinator: CoordinatorHandle,
    /// 接続ごとの ping/pong 設定
    pub heartbeat: HeartbeatConfig,
}
