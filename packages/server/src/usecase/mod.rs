//! UseCase 層
//!
//! 各コンポーネントの操作をユースケースとして実装し、`Coordinator` が
//! 単一のタスクからそれらを順番に呼び出します。

mod code_sync;
mod connect_participant;
mod coordinator;
mod disconnect_participant;
mod error;
mod join_room;
mod manage_poll;
mod relay_signal;
mod send_message;
mod track_speaking;
mod whiteboard;

#[cfg(test)]
mod test_support;

pub use code_sync::CodeSyncUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use coordinator::{Command, Coordinator, CoordinatorHandle};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::CoordinatorError;
pub use join_room::JoinRoomUseCase;
pub use manage_poll::PollUseCase;
pub use relay_signal::RelaySignalUseCase;
pub use send_message::SendMessageUseCase;
pub use track_speaking::SpeakingTimeUseCase;
pub use whiteboard::WhiteboardUseCase;

use crate::domain::{ConnectionId, MessagePusher, ServerEvent};

/// Broadcast `event` to `targets`, logging instead of failing.
async fn fan_out(pusher: &dyn MessagePusher, targets: Vec<ConnectionId>, event: &ServerEvent) {
    if targets.is_empty() {
        return;
    }
    if let Err(e) = pusher.broadcast(targets, event).await {
        tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
    }
}
