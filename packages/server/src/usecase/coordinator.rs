//! Single-consumer coordinator owning all room state.
//!
//! Every connection turns its inbound frames into [`Command`]s and sends them
//! through a [`CoordinatorHandle`]. One task drains the queue and runs each
//! command to completion before taking the next, so room mutations never
//! interleave and no lock guards the [`RoomRegistry`].

use std::sync::Arc;

use meetly_shared::time::Clock;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::domain::{
    ConnectionId, MessagePusher, ParticipantId, PusherChannel, RoomId, RoomRegistry,
    RoomSnapshot,
};

use super::{
    CodeSyncUseCase, ConnectParticipantUseCase, CoordinatorError, DisconnectParticipantUseCase,
    JoinRoomUseCase, PollUseCase, RelaySignalUseCase, SendMessageUseCase, SpeakingTimeUseCase,
    WhiteboardUseCase,
};

/// A structured request to the coordinator
#[derive(Debug)]
pub enum Command {
    Connect {
        connection_id: ConnectionId,
        channel: PusherChannel,
    },
    Join {
        connection_id: ConnectionId,
        room_id: RoomId,
    },
    Signal {
        from: ConnectionId,
        to: ConnectionId,
        payload: Value,
    },
    Chat {
        connection_id: ConnectionId,
        text: String,
        sender_name: String,
    },
    Draw {
        connection_id: ConnectionId,
        stroke: Value,
    },
    Clear {
        connection_id: ConnectionId,
    },
    StartSpeaking {
        connection_id: ConnectionId,
        participant_id: ParticipantId,
    },
    StopSpeaking {
        connection_id: ConnectionId,
        participant_id: ParticipantId,
    },
    GetCode {
        connection_id: ConnectionId,
    },
    CodeChange {
        connection_id: ConnectionId,
        text: String,
    },
    CreatePoll {
        room_id: RoomId,
        question: String,
        options: Vec<String>,
    },
    VotePoll {
        room_id: RoomId,
        option_index: usize,
    },
    EndPoll {
        room_id: RoomId,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
    /// Read-only diagnostics request
    Snapshot {
        reply: oneshot::Sender<Vec<RoomSnapshot>>,
    },
}

/// Cloneable sender side of the coordinator queue
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    pub fn send(&self, command: Command) -> Result<(), CoordinatorError> {
        self.tx.send(command).map_err(|_| CoordinatorError::Stopped)
    }

    /// Ask the coordinator for a snapshot of every room
    pub async fn snapshot(&self) -> Result<Vec<RoomSnapshot>, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await.map_err(|_| CoordinatorError::Stopped)
    }
}

/// Owner of the [`RoomRegistry`] and dispatcher of [`Command`]s
pub struct Coordinator {
    rooms: RoomRegistry,
    connect_participant: ConnectParticipantUseCase,
    disconnect_participant: DisconnectParticipantUseCase,
    join_room: JoinRoomUseCase,
    relay_signal: RelaySignalUseCase,
    send_message: SendMessageUseCase,
    code_sync: CodeSyncUseCase,
    whiteboard: WhiteboardUseCase,
    speaking_time: SpeakingTimeUseCase,
    poll: PollUseCase,
}

impl Coordinator {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: RoomRegistry::new(),
            connect_participant: ConnectParticipantUseCase::new(message_pusher.clone()),
            disconnect_participant: DisconnectParticipantUseCase::new(
                message_pusher.clone(),
                clock.clone(),
            ),
            join_room: JoinRoomUseCase::new(message_pusher.clone(), clock.clone()),
            relay_signal: RelaySignalUseCase::new(message_pusher.clone()),
            send_message: SendMessageUseCase::new(message_pusher.clone()),
            code_sync: CodeSyncUseCase::new(message_pusher.clone()),
            whiteboard: WhiteboardUseCase::new(message_pusher.clone()),
            speaking_time: SpeakingTimeUseCase::new(message_pusher.clone(), clock),
            poll: PollUseCase::new(message_pusher),
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Spawn the coordinator loop on the current runtime
    pub fn spawn(self) -> CoordinatorHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(self.run(rx));
        CoordinatorHandle { tx }
    }

    /// Drain `rx` until every handle has been dropped
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        tracing::debug!("Room coordinator started");
        while let Some(command) = rx.recv().await {
            self.handle(command).await;
        }
        tracing::debug!("Room coordinator stopped");
    }

    /// Run one command to completion
    pub async fn handle(&mut self, command: Command) {
        let rooms = &mut self.rooms;
        match command {
            Command::Connect {
                connection_id,
                channel,
            } => {
                self.connect_participant
                    .execute(connection_id, channel)
                    .await;
            }
            Command::Join {
                connection_id,
                room_id,
            } => {
                self.join_room.execute(rooms, connection_id, room_id).await;
            }
            Command::Signal { from, to, payload } => {
                self.relay_signal.execute(from, to, payload).await;
            }
            Command::Chat {
                connection_id,
                text,
                sender_name,
            } => {
                self.send_message
                    .execute(rooms, connection_id, sender_name, text)
                    .await;
            }
            Command::Draw {
                connection_id,
                stroke,
            } => {
                self.whiteboard.draw(rooms, connection_id, stroke).await;
            }
            Command::Clear { connection_id } => {
                self.whiteboard.clear(rooms, connection_id).await;
            }
            Command::StartSpeaking {
                connection_id,
                participant_id,
            } => {
                self.speaking_time
                    .start(rooms, connection_id, participant_id)
                    .await;
            }
            Command::StopSpeaking {
                connection_id,
                participant_id,
            } => {
                self.speaking_time
                    .stop(rooms, connection_id, participant_id)
                    .await;
            }
            Command::GetCode { connection_id } => {
                self.code_sync.get_current(rooms, connection_id).await;
            }
            Command::CodeChange {
                connection_id,
                text,
            } => {
                self.code_sync.apply_edit(rooms, connection_id, text).await;
            }
            Command::CreatePoll {
                room_id,
                question,
                options,
            } => {
                self.poll.create(rooms, room_id, question, options).await;
            }
            Command::VotePoll {
                room_id,
                option_index,
            } => {
                self.poll.vote(rooms, room_id, option_index).await;
            }
            Command::EndPoll { room_id } => {
                self.poll.end(rooms, room_id).await;
            }
            Command::Disconnect { connection_id } => {
                self.disconnect_participant
                    .execute(rooms, connection_id)
                    .await;
            }
            Command::Snapshot { reply } => {
                // The requester may have given up waiting.
                let _ = reply.send(rooms.snapshot());
            }
        }
    }
}
