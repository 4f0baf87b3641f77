//! Meetly room coordination server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin meetly-server
//! cargo run --bin meetly-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use clap::Parser;
use meetly_server::{
    config::{HeartbeatConfig, ServerConfig},
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::Coordinator,
};
use meetly_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "meetly-server")]
#[command(about = "Room coordination and WebRTC signaling server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds between WebSocket pings
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    ping_interval_secs: u64,

    /// Seconds to wait for a pong before closing the connection
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pong_timeout_secs: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            heartbeat: HeartbeatConfig {
                ping_interval: Duration::from_secs(args.ping_interval_secs),
                pong_timeout: Duration::from_secs(args.pong_timeout_secs),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger("meetly_server", env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. MessagePusher
    // 2. Coordinator (owns every room)
    // 3. Server

    // 1. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 2. Spawn the coordinator task
    let coordinator = Coordinator::new(message_pusher, Arc::new(SystemClock)).spawn();

    // 3. Create and run the server
    let server = Server::new(ServerConfig::from(args), coordinator);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
