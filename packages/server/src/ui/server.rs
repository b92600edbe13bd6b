//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::{EventPusher, RoomSequencer};
use crate::usecase::{
    AddTokenUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase, MoveTokenUseCase,
    SendChatMessageUseCase,
};

use super::{
    handler::http::{get_rooms, health_check},
    handler::websocket::websocket_handler,
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket state-sync relay server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_room_usecase,
///     send_chat_message_usecase,
///     move_token_usecase,
///     add_token_usecase,
///     leave_room_usecase,
///     list_rooms_usecase,
///     event_pusher,
/// );
/// server.run("127.0.0.1".to_string(), 3001).await?;
/// ```
pub struct Server {
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// SendChatMessageUseCase（チャット送信のユースケース）
    send_chat_message_usecase: Arc<SendChatMessageUseCase>,
    /// MoveTokenUseCase（トークン移動のユースケース）
    move_token_usecase: Arc<MoveTokenUseCase>,
    /// AddTokenUseCase（トークン追加のユースケース）
    add_token_usecase: Arc<AddTokenUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// EventPusher（接続の登録・登録解除に使う）
    event_pusher: Arc<dyn EventPusher>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        send_chat_message_usecase: Arc<SendChatMessageUseCase>,
        move_token_usecase: Arc<MoveTokenUseCase>,
        add_token_usecase: Arc<AddTokenUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        list_rooms_usecase: Arc<ListRoomsUseCase>,
        event_pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            join_room_usecase,
            send_chat_message_usecase,
            move_token_usecase,
            add_token_usecase,
            leave_room_usecase,
            list_rooms_usecase,
            event_pusher,
        }
    }

    /// Build the axum Router
    ///
    /// `run` と結合テストの両方から使えるように分離しています。
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase,
            send_chat_message_usecase: self.send_chat_message_usecase,
            move_token_usecase: self.move_token_usecase,
            add_token_usecase: self.add_token_usecase,
            leave_room_usecase: self.leave_room_usecase,
            list_rooms_usecase: self.list_rooms_usecase,
            event_pusher: self.event_pusher,
            sequencer: Arc::new(RoomSequencer::new()),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3001)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket state-sync relay listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
