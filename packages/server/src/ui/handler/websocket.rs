//! WebSocket connection handlers.
//!
//! 接続ごとに ConnectionId を採番し、受信タスクと送信タスクを張ります。
//! Session（この接続がどのルームにいるか）は受信ループが所有し、
//! イベントは到着順に 1 件ずつディスパッチされます。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, MessageDraft, Session, TokenDraft},
    infrastructure::dto::conversion,
    infrastructure::dto::websocket::{ClientEvent, ServerEvent, UserDto},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // 接続の識別子はリレーが採番する（クライアントは何も名乗らずに接続できる）
    let conn_id = ConnectionIdFactory::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, conn_id))
}

/// Spawns a task that receives events from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound event flow: events from other connections
/// (via rx channel) are sent to this connection's WebSocket.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events addressed to this connection
/// * `sender` - WebSocket sink to send events to this connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, conn_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // この接続への配信チャンネルを登録
    let (tx, rx) = mpsc::unbounded_channel();
    state.event_pusher.register(conn_id.clone(), tx).await;
    tracing::info!("Connection '{}' established", conn_id);

    let mut send_task = pusher_loop(rx, sender);

    // Session は受信ループが所有する。join 前のイベントはユースケース側で
    // 黙って捨てられる（プロトコルに否定応答のチャンネルが無い）。
    let mut session = Session::new();

    let recv_loop = async {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", conn_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // パースできないフレームはその場で捨てる
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("Dropped unparsable frame from '{}': {}", conn_id, e);
                            continue;
                        }
                    };

                    dispatch_client_event(&state, &mut session, &conn_id, event).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", conn_id);
                    break;
                }
                _ => {}
            }
        }
    };

    // 受信ループが終わったら送信タスクを落とす（逆も同様）
    tokio::select! {
        _ = recv_loop => send_task.abort(),
        _ = &mut send_task => {},
    }

    // 切断処理: 配信先から外した後、名簿から削除して残りのメンバーへ通知
    state.event_pusher.unregister(&conn_id).await;

    let _order = match session.joined_room() {
        Some(key) => Some(state.sequencer.acquire(key).await),
        None => None,
    };
    if let Some(removed) = state
        .leave_room_usecase
        .execute(session.joined_room(), &conn_id)
        .await
    {
        let left = ServerEvent::UserLeft {
            name: removed.user.name.clone(),
            users: removed.users.iter().cloned().map(Into::into).collect(),
        };
        let left_json = serde_json::to_string(&left).unwrap();
        if let Err(e) = state
            .leave_room_usecase
            .relay_user_left(&conn_id, &removed.member_ids, &left_json)
            .await
        {
            tracing::warn!("Failed to relay user-left for '{}': {}", conn_id, e);
        }
    }

    tracing::info!("Connection '{}' closed", conn_id);
}

/// インバウンドイベントを対応するユースケースへディスパッチする
///
/// アウトバウンドイベントのシリアライズはここで一度だけ行い、
/// 配信先の計算はユースケース側に任せます。
///
/// 各アームは処理の間ルームの順序ガードを保持します。ID の採番
/// （Registry のロック内）と配信チャンネルへの投入の間に他の送信者が
/// 割り込むと、メンバーが受理順と異なる順序でイベントを観測するためです。
async fn dispatch_client_event(
    state: &AppState,
    session: &mut Session,
    conn_id: &ConnectionId,
    event: ClientEvent,
) {
    match event {
        ClientEvent::JoinRoom { room_id, user } => {
            // 欠損フィールドのデフォルト補完は変換層で行う
            let request = conversion::to_join_request(room_id, user);
            let _order = state.sequencer.acquire(&request.room_key).await;
            session.join(request.room_key.clone(), request.user.name.clone());
            let joined_name = request.user.name.clone();

            let snapshot = state
                .join_room_usecase
                .execute(conn_id.clone(), request)
                .await;

            let users: Vec<UserDto> = snapshot.users.iter().cloned().map(Into::into).collect();
            let room_state = ServerEvent::RoomState {
                messages: snapshot.messages.into_iter().map(Into::into).collect(),
                tokens: snapshot.tokens.into_iter().map(Into::into).collect(),
                users: users.clone(),
            };

            let room_json = serde_json::to_string(&room_state).unwrap();
            if let Err(e) = state
                .join_room_usecase
                .reply_room_state(conn_id, &room_json)
                .await
            {
                tracing::error!("Failed to send room-state to '{}': {}", conn_id, e);
                return;
            }

            let joined = ServerEvent::UserJoined {
                name: joined_name,
                users,
            };
            let joined_json = serde_json::to_string(&joined).unwrap();
            if let Err(e) = state
                .join_room_usecase
                .relay_user_joined(conn_id, &snapshot.member_ids, &joined_json)
                .await
            {
                tracing::warn!("Failed to relay user-joined: {}", e);
            }
        }
        ClientEvent::ChatMessage {
            sender,
            text,
            channel,
            color,
            expression,
        } => {
            let draft = MessageDraft {
                sender,
                text,
                channel,
                color,
                expression,
            };
            let _order = match session.joined_room() {
                Some(key) => Some(state.sequencer.acquire(key).await),
                None => None,
            };
            let accepted = match state
                .send_chat_message_usecase
                .execute(session.joined_room(), draft)
                .await
            {
                Some(accepted) => accepted,
                None => {
                    tracing::warn!("Dropped chat-message from unjoined connection '{}'", conn_id);
                    return;
                }
            };

            let announce = ServerEvent::ChatMessage(accepted.message.into());
            let json = serde_json::to_string(&announce).unwrap();
            if let Err(e) = state
                .send_chat_message_usecase
                .announce_message(conn_id, &accepted.member_ids, &json)
                .await
            {
                tracing::warn!("Failed to announce chat-message: {}", e);
            }
        }
        ClientEvent::TokenMove { token_id, x, y } => {
            let _order = match session.joined_room() {
                Some(key) => Some(state.sequencer.acquire(key).await),
                None => None,
            };
            let moved = match state
                .move_token_usecase
                .execute(session.joined_room(), &token_id, x, y)
                .await
            {
                Some(moved) => moved,
                None => {
                    // 未知のトークンへの移動は正常な競合（削除済み・未同期）
                    tracing::debug!("Ignored token-move for '{}' from '{}'", token_id, conn_id);
                    return;
                }
            };

            let relayed = ServerEvent::TokenMoved { token_id, x, y };
            let json = serde_json::to_string(&relayed).unwrap();
            if let Err(e) = state
                .move_token_usecase
                .relay_token_moved(conn_id, &moved.member_ids, &json)
                .await
            {
                tracing::warn!("Failed to relay token-moved: {}", e);
            }
        }
        ClientEvent::TokenAdd { name, x, y, color } => {
            let draft = TokenDraft { name, x, y, color };
            let _order = match session.joined_room() {
                Some(key) => Some(state.sequencer.acquire(key).await),
                None => None,
            };
            let accepted = match state
                .add_token_usecase
                .execute(session.joined_room(), draft)
                .await
            {
                Some(accepted) => accepted,
                None => {
                    tracing::warn!("Dropped token-add from unjoined connection '{}'", conn_id);
                    return;
                }
            };

            let announce = ServerEvent::TokenAdded(accepted.token.into());
            let json = serde_json::to_string(&announce).unwrap();
            if let Err(e) = state
                .add_token_usecase
                .announce_token_added(conn_id, &accepted.member_ids, &json)
                .await
            {
                tracing::warn!("Failed to announce token-added: {}", e);
            }
        }
    }
}
