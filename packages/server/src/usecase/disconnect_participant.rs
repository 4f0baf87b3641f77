//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 残りのメンバーへの user-left 通知、最後の参加者が抜けた Room の状態削除
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし、Room 削除）
//! - エッジケース：Room に参加せずに切断（何もしない）

use std::sync::Arc;

use meetly_shared::time::Clock;

use crate::domain::{
    ConnectionId, LeaveOutcome, MessagePusher, RoomRegistry, ServerEvent, Timestamp,
};

use super::fan_out;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(LeaveOutcome)` - Room から退出した
    /// * `None` - Room に参加していなかった（通知もクリーンアップもしない）
    pub async fn execute(
        &self,
        rooms: &mut RoomRegistry,
        connection_id: ConnectionId,
    ) -> Option<LeaveOutcome> {
        let outcome = rooms.leave(&connection_id);

        if let Some(outcome) = &outcome {
            announce_departure(self.message_pusher.as_ref(), &connection_id, outcome).await;
            if let Some(joined_at) = outcome.joined_at {
                let now = Timestamp::new(self.clock.now_millis());
                tracing::info!(
                    "Connection '{}' was online in room '{}' for {} ms",
                    connection_id,
                    outcome.room_id,
                    now.millis_since(joined_at)
                );
            }
        }

        self.message_pusher.unregister_client(&connection_id).await;
        tracing::info!("Connection '{}' disconnected", connection_id);

        outcome
    }
}

/// 残りのメンバーに user-left を通知する
pub(super) async fn announce_departure(
    pusher: &dyn MessagePusher,
    departing: &ConnectionId,
    outcome: &LeaveOutcome,
) {
    let left = ServerEvent::UserLeft {
        departing: departing.clone(),
    };
    fan_out(pusher, outcome.remaining.clone(), &left).await;

    if outcome.room_closed {
        tracing::info!("Room '{}' is empty, state purged", outcome.room_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatMessage, Poll},
        usecase::test_support::{RecordingPusher, conn, manual_clock, participant, room},
    };

    fn setup(members: &[&str]) -> RoomRegistry {
        let mut rooms = RoomRegistry::new();
        for id in members {
            rooms.join(conn(id), room("r"), Timestamp::new(1_000));
        }
        rooms
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_members() {
        // テスト項目: 切断時に残りのメンバーにだけ user-left が届く
        // given (前提条件):
        let pusher = RecordingPusher::new();
        let usecase = DisconnectParticipantUseCase::new(pusher.clone(), manual_clock());
        let mut rooms = setup(&["alice", "bob", "charlie"]);

        // when (操作):
        let outcome = usecase.execute(&mut rooms, conn("alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.remaining, vec![conn("bob"), conn("charlie")]);
        assert!(!outcome.room_closed);
        assert_eq!(
            pusher.recipients_of("user-left"),
            vec![conn("bob"), conn("charlie")]
        );
        assert!(pusher.events_for(&conn("alice")).is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_last_member_purges_room() {
        // テスト項目: 最後の参加者が切断すると Room の全状態が削除される
        // given (前提条件):
        let pusher = RecordingPusher::new();
        let usecase = DisconnectParticipantUseCase::new(pusher.clone(), manual_clock());
        let mut rooms = setup(&["alice"]);
        {
            let r = rooms.room_mut(&room("r")).unwrap();
            r.post_message(ChatMessage::new("A".into(), "hi".into(), conn("alice")));
            r.replace_document("let x = 1;".into());
            r.ledger_mut().start(participant("alice"), Timestamp::new(1_000));
            r.create_poll(Poll::new("Q".into(), vec!["A".into(), "B".into()]));
        }

        // when (操作):
        let outcome = usecase.execute(&mut rooms, conn("alice")).await.unwrap();

        // then (期待する結果):
        assert!(outcome.room_closed);
        assert!(rooms.room(&room("r")).is_none());
        assert_eq!(rooms.room_count(), 0);
        assert_eq!(pusher.delivery_count(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_without_join_is_noop() {
        // テスト項目: Room に参加していない接続の切断は通知もクリーンアップもしない
        // given (前提条件):
        let pusher = RecordingPusher::new();
        let usecase = DisconnectParticipantUseCase::new(pusher.clone(), manual_clock());
        let mut rooms = setup(&["alice"]);

        // when (操作):
        let outcome = usecase.execute(&mut rooms, conn("lurker")).await;

        // then (期待する結果):
        assert!(outcome.is_none());
        assert_eq!(pusher.delivery_count(), 0);
        assert_eq!(rooms.room(&room("r")).unwrap().members(), &[conn("alice")]);
    }

    #[tokio::test]
    async fn test_disconnect_unregisters_channel() {
        // テスト項目: 切断時に送信チャンネルの登録が解除される
        // given (前提条件):
        let pusher = RecordingPusher::new();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;
        let usecase = DisconnectParticipantUseCase::new(pusher.clone(), manual_clock());
        let mut rooms = setup(&["alice"]);

        // when (操作):
        usecase.execute(&mut rooms, conn("alice")).await;

        // then (期待する結果):
        assert!(!pusher.is_registered(&conn("alice")));
    }
}
