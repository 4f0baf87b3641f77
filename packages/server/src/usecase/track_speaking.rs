//! UseCase: 発話時間の記録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SpeakingTimeUseCase::start() / stop() メソッド
//! - 発話区間の累積と、Room 全員への update-times 配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：start → stop で経過時間が累積される
//! - エッジケース：発話中の start（区間を維持）、start していない stop（何もしない）

use std::{collections::BTreeMap, sync::Arc};

use meetly_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, ParticipantId, RoomRegistry, ServerEvent, SpeakingRecord,
    Timestamp,
};

use super::fan_out;

/// 発話時間記録のユースケース
pub struct SpeakingTimeUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SpeakingTimeUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 発話開始。Room に参加していれば更新後の表を全員に配信して返す
    pub async fn start(
        &self,
        rooms: &mut RoomRegistry,
        connection_id: ConnectionId,
        participant_id: ParticipantId,
    ) -> Option<BTreeMap<ParticipantId, SpeakingRecord>> {
        let now = self.now();
        let room = rooms.room_of_mut(&connection_id)?;
        if !room.ledger_mut().start(participant_id.clone(), now) {
            tracing::debug!(
                "'{}' is already speaking in room '{}', keeping interval",
                participant_id,
                room.id
            );
        }
        let table = room.ledger().records().clone();
        let targets = room.members().to_vec();

        self.publish(targets, table.clone()).await;
        Some(table)
    }

    /// 発話終了。区間が閉じられた場合だけ全員に配信して返す
    pub async fn stop(
        &self,
        rooms: &mut RoomRegistry,
        connection_id: ConnectionId,
        participant_id: ParticipantId,
    ) -> Option<BTreeMap<ParticipantId, SpeakingRecord>> {
        let now = self.now();
        let room = rooms.room_of_mut(&connection_id)?;
        if !room.ledger_mut().stop(&participant_id, now) {
            return None;
        }
        let table = room.ledger().records().clone();
        let targets = room.members().to_vec();

        self.publish(targets, table.clone()).await;
        Some(table)
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    async fn publish(
        &self,
        targets: Vec<ConnectionId>,
        table: BTreeMap<ParticipantId, SpeakingRecord>,
    ) {
        fan_out(
            self.message_pusher.as_ref(),
            targets,
            &ServerEvent::UpdateTimes { table },
        )
        .await;
    }
}
