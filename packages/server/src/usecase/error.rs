//! UseCase 層のエラー型

use thiserror::Error;

/// Coordinator との通信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// Coordinator タスクが停止している
    #[error("room coordinator has stopped")]
    Stopped,
}
