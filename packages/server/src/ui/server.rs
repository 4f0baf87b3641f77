//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::ServerConfig, usecase::CoordinatorHandle};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Meeting room coordination server
///
/// # Example
///
/// ```ignore
/// let coordinator = Coordinator::new(message_pusher, clock).spawn();
/// let server = Server::new(ServerConfig::default(), coordinator);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    coordinator: CoordinatorHandle,
}

impl Server {
    pub fn new(config: ServerConfig, coordinator: CoordinatorHandle) -> Self {
        Self {
            config,
            coordinator,
        }
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            coordinator: self.coordinator.clone(),
            heartbeat: self.config.heartbeat,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app = self.router();

        tracing::info!("Meetly server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Bind to the configured address and serve
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        self.serve(listener).await
    }
}
