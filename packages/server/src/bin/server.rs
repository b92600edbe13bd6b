//! Room-scoped WebSocket state-sync relay server.
//!
//! Keeps a chat log, positioned tokens and a user roster per room, and
//! relays state changes to the other members of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin taku-server
//! cargo run --bin taku-server -- --host 0.0.0.0 --port 3001
//! ```

use std::sync::Arc;

use clap::Parser;
use taku_server::{
    infrastructure::{pusher::WebSocketEventPusher, registry::InMemoryRoomRegistry},
    ui::Server,
    usecase::{
        AddTokenUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase, MoveTokenUseCase,
        SendChatMessageUseCase,
    },
};
use taku_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "taku-server")]
#[command(about = "Room-scoped WebSocket state-sync relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3001")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. EventPusher
    // 3. UseCases
    // 4. Server

    // 1. Create Registry (in-memory room table)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = Arc::new(InMemoryRoomRegistry::new(clock.clone()));

    // 2. Create EventPusher (WebSocket implementation)
    let event_pusher = Arc::new(WebSocketEventPusher::new());

    // 3. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        event_pusher.clone(),
    ));
    let send_chat_message_usecase = Arc::new(SendChatMessageUseCase::new(
        registry.clone(),
        event_pusher.clone(),
        clock,
    ));
    let move_token_usecase = Arc::new(MoveTokenUseCase::new(
        registry.clone(),
        event_pusher.clone(),
    ));
    let add_token_usecase = Arc::new(AddTokenUseCase::new(
        registry.clone(),
        event_pusher.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        registry.clone(),
        event_pusher.clone(),
    ));
    let list_rooms_usecase = Arc::new(ListRoomsUseCase::new(registry.clone()));

    // 4. Create and run the server
    let server = Server::new(
        join_room_usecase,
        send_chat_message_usecase,
        move_token_usecase,
        add_token_usecase,
        leave_room_usecase,
        list_rooms_usecase,
        event_pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
