//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval, timeout},
};

use crate::{
    config::HeartbeatConfig,
    domain::ConnectionId,
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::{Command, CoordinatorHandle},
};

const MIN_PING_INTERVAL: Duration = Duration::from_millis(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards encoded events and control frames to the WebSocket sender.
///
/// Events come from the coordinator through `rx`. Ping and close frames come
/// from the heartbeat task through `control_rx`. The loop ends after a close
/// frame is written or when the socket stops accepting writes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut control_rx: mpsc::UnboundedReceiver<Message>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                Some(frame) = rx.recv() => Message::Text(frame.into()),
                Some(control) = control_rx.recv() => control,
                else => break,
            };
            let is_close = matches!(msg, Message::Close(_));
            if sender.send(msg).await.is_err() || is_close {
                break;
            }
        }
    })
}

/// Spawns the liveness probe.
///
/// Sends a ping every `ping_interval` and asks the writer to close the socket
/// when no pong arrives within `pong_timeout`.
fn heartbeat_loop(
    connection_id: ConnectionId,
    config: HeartbeatConfig,
    control_tx: mpsc::UnboundedSender<Message>,
    mut pong_rx: mpsc::UnboundedReceiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // tokio の interval は 0 を受け付けない
        let mut ticker = interval(config.ping_interval.max(MIN_PING_INTERVAL));
        // 最初の tick は即座に完了するのでスキップ
        ticker.tick().await;

        loop {
            ticker.tick().await;

            // 前回の ping 以降に届いた pong は読み捨てる
            while pong_rx.try_recv().is_ok() {}

            if control_tx.send(Message::Ping(Default::default())).is_err() {
                break;
            }

            match timeout(config.pong_timeout, pong_rx.recv()).await {
                Ok(Some(())) => {}
                _ => {
                    tracing::warn!("Pong timeout for '{}', closing connection", connection_id);
                    let _ = control_tx.send(Message::Close(Some(CloseFrame {
                        code: close_code::AWAY,
                        reason: "Pong timeout".into(),
                    })));
                    break;
                }
            }
        }
    })
}

/// Spawns a task that turns inbound frames into coordinator commands.
fn receiver_loop(
    connection_id: ConnectionId,
    coordinator: CoordinatorHandle,
    pong_tx: mpsc::UnboundedSender<()>,
    mut receiver: SplitStream<WebSocket>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::trace!("Received text from '{}': {}", connection_id, text.as_str());

                    let command = match ClientEvent::parse(text.as_str()) {
                        Ok(event) => event.into_command(connection_id.clone()),
                        Err(e) => {
                            tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
                            continue;
                        }
                    };
                    let command = match command {
                        Ok(command) => command,
                        Err(e) => {
                            tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
                            continue;
                        }
                    };

                    if coordinator.send(command).is_err() {
                        tracing::error!("Coordinator stopped, closing '{}'", connection_id);
                        break;
                    }
                }
                Message::Pong(_) => {
                    let _ = pong_tx.send(());
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping from '{}'", connection_id);
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id);
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, receiver) = socket.split();

    // Create a channel for this client to receive events
    let (tx, rx) = mpsc::unbounded_channel();

    // register_client は Coordinator の中で呼ばれる
    if let Err(e) = state.coordinator.send(Command::Connect {
        connection_id: connection_id.clone(),
        channel: tx,
    }) {
        tracing::error!("Failed to register '{}': {}", connection_id, e);
        return;
    }
    tracing::info!("Client '{}' connected", connection_id);

    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (pong_tx, pong_rx) = mpsc::unbounded_channel();

    let mut send_task = pusher_loop(rx, control_rx, sender);
    let mut recv_task = receiver_loop(
        connection_id.clone(),
        state.coordinator.clone(),
        pong_tx,
        receiver,
    );
    let heartbeat_task = heartbeat_loop(
        connection_id.clone(),
        state.heartbeat,
        control_tx,
        pong_rx,
    );

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };
    heartbeat_task.abort();

    // 切断処理（ルーム退出・チャネル登録解除）は Coordinator に委譲
    if let Err(e) = state.coordinator.send(Command::Disconnect {
        connection_id: connection_id.clone(),
    }) {
        tracing::warn!("Failed to disconnect '{}': {}", connection_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - heartbeat_loop: pong が返らなければ Ping の後に Close(1001) を要求する
    // - heartbeat_loop: pong が返り続ける限り Close は要求されない
    // - ping 間隔 0 でもタスクが panic しない
    // ========================================

    const RECV_TIMEOUT: Duration = Duration::from_secs(2);

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    async fn next_control(rx: &mut mpsc::UnboundedReceiver<Message>) -> Message {
        timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap()
    }

    fn assert_away_close(msg: Message) {
        match msg {
            Message::Close(Some(frame)) => assert_eq!(frame.code, close_code::AWAY),
            other => panic!("expected close frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_pong_requests_close() {
        // テスト項目: pong が返らない接続は Ping の後に Close(1001) が要求される
        // given (前提条件):
        let config = HeartbeatConfig {
            ping_interval: Duration::from_millis(20),
            pong_timeout: Duration::from_millis(10),
        };
        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let (_pong_tx, pong_rx) = mpsc::unbounded_channel();

        // when (操作):
        let handle = heartbeat_loop(conn("silent"), config, control_tx, pong_rx);

        // then (期待する結果):
        assert!(matches!(next_control(&mut control_rx).await, Message::Ping(_)));
        assert_away_close(next_control(&mut control_rx).await);
        assert!(timeout(RECV_TIMEOUT, handle).await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_answered_pings_keep_connection_open() {
        // テスト項目: ping に毎回 pong が返る接続には Close が要求されない
        // given (前提条件):
        let config = HeartbeatConfig {
            ping_interval: Duration::from_millis(20),
            pong_timeout: Duration::from_millis(500),
        };
        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let (pong_tx, pong_rx) = mpsc::unbounded_channel();
        let handle = heartbeat_loop(conn("alive"), config, control_tx, pong_rx);

        // when (操作):
        for _ in 0..3 {
            let msg = next_control(&mut control_rx).await;
            assert!(matches!(msg, Message::Ping(_)), "unexpected {:?}", msg);
            pong_tx.send(()).unwrap();
        }

        // then (期待する結果):
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_zero_ping_interval_does_not_panic() {
        // テスト項目: ping 間隔 0 でもタスクは panic せず、pong がなければ Close を要求する
        // given (前提条件):
        let config = HeartbeatConfig {
            ping_interval: Duration::ZERO,
            pong_timeout: Duration::from_millis(10),
        };
        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let (_pong_tx, pong_rx) = mpsc::unbounded_channel();

        // when (操作):
        let handle = heartbeat_loop(conn("zero"), config, control_tx, pong_rx);

        // then (期待する結果):
        assert!(matches!(next_control(&mut control_rx).await, Message::Ping(_)));
        assert_away_close(next_control(&mut control_rx).await);
        assert!(timeout(RECV_TIMEOUT, handle).await.unwrap().is_ok());
    }
}
