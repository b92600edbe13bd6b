//! インメモリ RoomRegistry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 各操作は Mutex を 1 回だけ取得してその中で完結するため、
//! 同じキーへ同時に join してもルームが二重に作られることはありません
//! （check-then-insert の原子性）。一度作られたルームはプロセスが
//! 生きている限りテーブルから取り除かれません。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taku_shared::time::{Clock, timestamp_to_clock_time};

use crate::domain::{
    AcceptedMessage, AcceptedToken, ConnectionId, MessageDraft, MovedToken, RemovedUser, Room,
    RoomKey, RoomRegistry, RoomSnapshot, RoomSummary, TokenDraft, User,
};
use crate::domain::value_object::Timestamp;

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry {
    /// ルームキー → Room のテーブル
    rooms: Mutex<HashMap<RoomKey, Room>>,
    /// ルーム作成時刻・ウェルカムメッセージの時刻に使うクロック
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, key: &RoomKey, conn_id: ConnectionId, user: User) -> RoomSnapshot {
        let mut rooms = self.rooms.lock().await;

        let room = rooms.entry(key.clone()).or_insert_with(|| {
            let now = self.clock.now_jst_millis();
            tracing::info!("Room '{}' created", key);
            Room::seeded(key.clone(), Timestamp::new(now), timestamp_to_clock_time(now))
        });

        room.upsert_user(conn_id, user);

        RoomSnapshot {
            messages: room.messages.clone(),
            tokens: room.tokens.clone(),
            users: room.user_list(),
            member_ids: room.member_ids(),
        }
    }

    async fn append_message(
        &self,
        key: &RoomKey,
        draft: MessageDraft,
        timestamp: String,
    ) -> Option<AcceptedMessage> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(key)?;

        let message = room.append_message(draft, timestamp);
        Some(AcceptedMessage {
            message,
            member_ids: room.member_ids(),
        })
    }

    async fn move_token(
        &self,
        key: &RoomKey,
        token_id: &str,
        x: f64,
        y: f64,
    ) -> Option<MovedToken> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(key)?;

        if !room.move_token(token_id, x, y) {
            return None;
        }

        Some(MovedToken {
            member_ids: room.member_ids(),
        })
    }

    async fn add_token(&self, key: &RoomKey, draft: TokenDraft) -> Option<AcceptedToken> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(key)?;

        let token = room.add_token(draft);
        Some(AcceptedToken {
            token,
            member_ids: room.member_ids(),
        })
    }

    async fn remove_user(&self, key: &RoomKey, conn_id: &ConnectionId) -> Option<RemovedUser> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(key)?;

        let user = room.remove_user(conn_id)?;
        Some(RemovedUser {
            user,
            users: room.user_list(),
            member_ids: room.member_ids(),
            room_now_empty: room.is_empty(),
        })
    }

    async fn room_summaries(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;

        let mut summaries: Vec<RoomSummary> = rooms
            .values()
            .map(|room| RoomSummary {
                key: room.key.clone(),
                user_count: room.users.len(),
                message_count: room.messages.len(),
                token_count: room.tokens.len(),
                created_at: room.created_at,
            })
            .collect();

        // Sort by room key for consistent ordering
        summaries.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        summaries
    }
}
