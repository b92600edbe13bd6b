//! Integration tests: 実際の WebSocket 接続でリレーの配信セマンティクスを検証する。

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use taku_server::{
    infrastructure::{pusher::WebSocketEventPusher, registry::InMemoryRoomRegistry},
    ui::Server,
    usecase::{
        AddTokenUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase, MoveTokenUseCase,
        SendChatMessageUseCase,
    },
};
use taku_shared::time::{Clock, SystemClock};

/// Start an in-process relay server on an ephemeral port and return its ws:// URL.
async fn start_test_server() -> String {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = Arc::new(InMemoryRoomRegistry::new(clock.clone()));
    let event_pusher = Arc::new(WebSocketEventPusher::new());

    let server = Server::new(
        Arc::new(JoinRoomUseCase::new(registry.clone(), event_pusher.clone())),
        Arc::new(SendChatMessageUseCase::new(
            registry.clone(),
            event_pusher.clone(),
            clock,
        )),
        Arc::new(MoveTokenUseCase::new(registry.clone(), event_pusher.clone())),
        Arc::new(AddTokenUseCase::new(registry.clone(), event_pusher.clone())),
        Arc::new(LeaveRoomUseCase::new(registry.clone(), event_pusher.clone())),
        Arc::new(ListRoomsUseCase::new(registry.clone())),
        event_pusher,
    );
    let app = server.router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("ws://{}/ws", addr)
}

/// Helper struct wrapping a raw WebSocket client connection
struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn connect(url: &str) -> Self {
        let (ws, _response) = connect_async(url).await.expect("Failed to connect");
        TestClient { ws }
    }

    async fn send_json(&mut self, value: Value) {
        self.ws
            .send(Message::Text(value.to_string().into()))
            .await
            .expect("Failed to send");
    }

    /// Receive the next text frame as JSON (non-text frames are skipped).
    async fn recv_json(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(3), self.ws.next())
                .await
                .expect("Timed out waiting for event")
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON from server");
            }
        }
    }

    /// Assert that no event arrives within the window.
    async fn assert_silent(&mut self) {
        let result = tokio::time::timeout(Duration::from_millis(300), self.ws.next()).await;
        assert!(result.is_err(), "Expected no event, got: {:?}", result);
    }

    /// Join a room and return the room-state reply.
    async fn join(&mut self, room: &str, name: &str) -> Value {
        self.send_json(json!({
            "type": "join-room",
            "roomId": room,
            "user": { "name": name, "color": "#3b82f6" },
        }))
        .await;
        let state = self.recv_json().await;
        assert_eq!(state["type"], "room-state");
        state
    }

    async fn close(mut self) {
        self.ws.close(None).await.expect("Failed to close");
    }
}

#[tokio::test]
async fn test_join_replies_seeded_room_state() {
    // テスト項目: 初回 join でシード済みのルーム全状態が返る
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;

    // when (操作):
    let state = alice.join("default", "Alice").await;

    // then (期待する結果): シードのメッセージ 1 件とトークン 2 体、名簿は本人のみ
    let messages = state["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["id"], "system-1");
    assert_eq!(messages[0]["sender"], "System");

    let tokens = state["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0]["id"], "token-1");
    assert_eq!(tokens[0]["name"], "Hero");
    assert_eq!(tokens[0]["x"], 200.0);
    assert_eq!(tokens[1]["id"], "token-2");
    assert_eq!(tokens[1]["name"], "Orc");

    let users = state["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Alice");
}

#[tokio::test]
async fn test_join_with_empty_payload_uses_defaults() {
    // テスト項目: roomId・user を省略した join がデフォルト値で成立する
    // given (前提条件):
    let url = start_test_server().await;
    let mut client = TestClient::connect(&url).await;

    // when (操作):
    client.send_json(json!({ "type": "join-room" })).await;
    let state = client.recv_json().await;

    // then (期待する結果):
    assert_eq!(state["type"], "room-state");
    let users = state["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Anonymous");
    assert_eq!(users[0]["color"], "#3b82f6");
}

#[tokio::test]
async fn test_second_join_notifies_existing_members() {
    // テスト項目: 2 人目の join で既存メンバーに user-joined が届き、本人には届かない
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("default", "Alice").await;

    // when (操作):
    let mut bob = TestClient::connect(&url).await;
    let bob_state = bob.join("default", "Bob").await;

    // then (期待する結果): Bob の room-state には 2 人分の名簿
    assert_eq!(bob_state["users"].as_array().unwrap().len(), 2);

    // Alice には user-joined が届く
    let joined = alice.recv_json().await;
    assert_eq!(joined["type"], "user-joined");
    assert_eq!(joined["name"], "Bob");
    assert_eq!(joined["users"].as_array().unwrap().len(), 2);

    // Bob に user-joined は届かない（room-state と重複しない）
    bob.assert_silent().await;
}

#[tokio::test]
async fn test_chat_message_announced_to_all_with_assigned_id() {
    // テスト項目: chat-message が ID・タイムスタンプ採番済みで送信者含む全員に届く
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("default", "Alice").await;
    let mut bob = TestClient::connect(&url).await;
    bob.join("default", "Bob").await;
    alice.recv_json().await; // user-joined (Bob)

    // when (操作):
    alice
        .send_json(json!({
            "type": "chat-message",
            "sender": "Alice",
            "text": "攻撃します！",
            "channel": "main",
        }))
        .await;

    // then (期待する結果): 両者に同じ完成形が届く
    let msg_alice = alice.recv_json().await;
    let msg_bob = bob.recv_json().await;
    assert_eq!(msg_alice, msg_bob);
    assert_eq!(msg_alice["type"], "chat-message");
    assert_eq!(msg_alice["id"], "msg-1");
    assert_eq!(msg_alice["text"], "攻撃します！");

    // timestamp は "HH:MM" 形式
    let timestamp = msg_alice["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), 5);
    assert_eq!(timestamp.as_bytes()[2], b':');
}

#[tokio::test]
async fn test_token_move_relayed_to_others_only() {
    // テスト項目: token-moved が移動した本人を除くメンバーにのみ届く
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("default", "Alice").await;
    let mut bob = TestClient::connect(&url).await;
    bob.join("default", "Bob").await;
    alice.recv_json().await; // user-joined (Bob)

    // when (操作):
    alice
        .send_json(json!({
            "type": "token-move",
            "tokenId": "token-1",
            "x": 320.0,
            "y": 240.0,
        }))
        .await;

    // then (期待する結果): Bob にだけ届く
    let moved = bob.recv_json().await;
    assert_eq!(moved["type"], "token-moved");
    assert_eq!(moved["tokenId"], "token-1");
    assert_eq!(moved["x"], 320.0);
    assert_eq!(moved["y"], 240.0);
    alice.assert_silent().await;
}

#[tokio::test]
async fn test_token_add_announced_with_assigned_id() {
    // テスト項目: token-added が ID 採番済みで追加した本人を含む全員に届く
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("default", "Alice").await;

    // when (操作):
    alice
        .send_json(json!({
            "type": "token-add",
            "name": "Dragon",
            "x": 100.0,
            "y": 120.0,
            "color": "#22c55e",
        }))
        .await;

    // then (期待する結果): シードの 2 体に続く ID が採番される
    let added = alice.recv_json().await;
    assert_eq!(added["type"], "token-added");
    assert_eq!(added["id"], "token-3");
    assert_eq!(added["name"], "Dragon");
    assert_eq!(added["color"], "#22c55e");
}

#[tokio::test]
async fn test_disconnect_notifies_remaining_members() {
    // テスト項目: 切断で残りのメンバーに user-left が届く
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("default", "Alice").await;
    let mut bob = TestClient::connect(&url).await;
    bob.join("default", "Bob").await;
    alice.recv_json().await; // user-joined (Bob)

    // when (操作):
    bob.close().await;

    // then (期待する結果):
    let left = alice.recv_json().await;
    assert_eq!(left["type"], "user-left");
    assert_eq!(left["name"], "Bob");
    let users = left["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Alice");
}

#[tokio::test]
async fn test_room_history_survives_while_empty() {
    // テスト項目: 全員切断後もルームの履歴が保持され、再参加で見える
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("default", "Alice").await;
    alice
        .send_json(json!({
            "type": "chat-message",
            "sender": "Alice",
            "text": "hello",
            "channel": "main",
        }))
        .await;
    alice.recv_json().await; // 自分への chat-message
    alice.close().await;

    // when (操作): 少し待ってから別のクライアントが同じルームに入る
    tokio::time::sleep(Duration::from_millis(200)).await;
    let mut carol = TestClient::connect(&url).await;
    let state = carol.join("default", "Carol").await;

    // then (期待する結果): シード + Alice のメッセージが残っている
    let messages = state["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["text"], "hello");
    assert_eq!(state["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    // テスト項目: 別ルームのメンバーにはイベントが届かない
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("alpha", "Alice").await;
    let mut bob = TestClient::connect(&url).await;
    bob.join("beta", "Bob").await;

    // when (操作):
    alice
        .send_json(json!({
            "type": "chat-message",
            "sender": "Alice",
            "text": "hello alpha",
            "channel": "main",
        }))
        .await;

    // then (期待する結果): Alice には届き、Bob には何も届かない
    let msg = alice.recv_json().await;
    assert_eq!(msg["type"], "chat-message");
    bob.assert_silent().await;
}

#[tokio::test]
async fn test_unparsable_frame_does_not_drop_connection() {
    // テスト項目: パースできないフレームは捨てられ、接続は維持される
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("default", "Alice").await;

    // when (操作): 未知のイベント種別とただの文字列を送る
    alice
        .send_json(json!({ "type": "dice-roll", "faces": 6 }))
        .await;
    alice
        .ws
        .send(Message::Text("not json at all".into()))
        .await
        .expect("Failed to send");

    // その後の正常なイベントは処理される
    alice
        .send_json(json!({
            "type": "chat-message",
            "sender": "Alice",
            "text": "still alive",
            "channel": "main",
        }))
        .await;

    // then (期待する結果):
    let msg = alice.recv_json().await;
    assert_eq!(msg["type"], "chat-message");
    assert_eq!(msg["text"], "still alive");
}

#[tokio::test]
async fn test_concurrent_senders_observe_one_acceptance_order() {
    // テスト項目: 2 接続から並行送信しても全メンバーが同じ受理順で観測する
    // given (前提条件):
    let url = start_test_server().await;
    let mut alice = TestClient::connect(&url).await;
    alice.join("default", "Alice").await;
    let mut bob = TestClient::connect(&url).await;
    bob.join("default", "Bob").await;
    alice.recv_json().await; // user-joined (Bob)

    // when (操作): 両者が同時に 50 件ずつ送り、それぞれ 100 件受信する
    async fn run(client: &mut TestClient, name: &str) -> Vec<u64> {
        for i in 0..50 {
            client
                .send_json(json!({
                    "type": "chat-message",
                    "sender": name,
                    "text": format!("{} {}", name, i),
                    "channel": "main",
                }))
                .await;
        }
        let mut ids = Vec::with_capacity(100);
        for _ in 0..100 {
            let msg = client.recv_json().await;
            assert_eq!(msg["type"], "chat-message");
            let id = msg["id"].as_str().unwrap();
            ids.push(id.strip_prefix("msg-").unwrap().parse::<u64>().unwrap());
        }
        ids
    }
    let (alice_ids, bob_ids) = tokio::join!(run(&mut alice, "Alice"), run(&mut bob, "Bob"));

    // then (期待する結果): ID は採番順に届き、両者の観測順が一致する
    assert_eq!(alice_ids, (1..=100).collect::<Vec<u64>>());
    assert_eq!(bob_ids, alice_ids);
}

#[tokio::test]
async fn test_events_before_join_are_ignored() {
    // テスト項目: join 前のイベントは黙って無視され、接続は維持される
    // given (前提条件):
    let url = start_test_server().await;
    let mut client = TestClient::connect(&url).await;

    // when (操作): join せずにチャットとトークン移動を送る
    client
        .send_json(json!({
            "type": "chat-message",
            "sender": "Nobody",
            "text": "hello?",
            "channel": "main",
        }))
        .await;
    client
        .send_json(json!({
            "type": "token-move",
            "tokenId": "token-1",
            "x": 0.0,
            "y": 0.0,
        }))
        .await;

    // then (期待する結果): 何も届かず、その後の join は成立する
    client.assert_silent().await;
    let state = client.join("default", "Alice").await;
    assert_eq!(state["messages"].as_array().unwrap().len(), 1);
}
