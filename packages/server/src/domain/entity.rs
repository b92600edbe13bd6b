//! ドメインエンティティ定義
//!
//! Room はルーム単位の正とするべき状態（チャットログ、トークン、
//! ユーザー名簿）を保持します。メッセージ ID とトークン ID は受理時に
//! リレーが採番するため、ルーム内で衝突しません。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value_object::{ConnectionId, RoomKey, Timestamp};

/// デフォルトの表示色（ユーザー・シードトークン共通）
pub const DEFAULT_COLOR: &str = "#3b82f6";
/// 表示名未指定時のフォールバック
pub const ANONYMOUS_NAME: &str = "Anonymous";
/// トークン名未指定時のフォールバック
pub const DEFAULT_TOKEN_NAME: &str = "Token";

/// チャットの表示チャンネル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Main,
    Sub,
}

/// チャットメッセージ
///
/// 作成後は不変。ログへは追記のみで、並び替え・削除は行われません。
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// リレー採番のメッセージ ID（ルーム内で一意）
    pub id: String,
    /// 送信者の表示名
    pub sender: String,
    pub text: String,
    /// 受理時刻の "HH:MM" 表記
    pub timestamp: String,
    pub channel: Channel,
    pub color: Option<String>,
    pub expression: Option<String>,
}

/// ID・タイムスタンプ採番前のチャットメッセージ
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub sender: String,
    pub text: String,
    pub channel: Channel,
    pub color: Option<String>,
    pub expression: Option<String>,
}

/// シーン上に配置されるトークン
///
/// 作成後に変化するのは座標（x, y）のみ。
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// リレー採番のトークン ID（ルーム内で一意）
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

/// ID 採番前のトークン
#[derive(Debug, Clone)]
pub struct TokenDraft {
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub color: Option<String>,
}

/// ルームに参加しているユーザー
///
/// 接続 ID をキーに管理されるため、name 自体に一意性はありません。
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub color: String,
}

/// join-room イベントをデフォルト補完した参加リクエスト
#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub room_key: RoomKey,
    pub user: User,
}

/// ルーム単位の共有状態
///
/// 一度作成された Room はプロセスが生きている限り破棄されません。
/// 全員が切断してもチャットログとトークンは保持され、再参加した
/// クライアントは過去の状態をそのまま受け取ります。
#[derive(Debug, Clone)]
pub struct Room {
    pub key: RoomKey,
    pub created_at: Timestamp,
    /// チャットログ（追記順 = 配信順）
    pub messages: Vec<ChatMessage>,
    /// トークン一覧（ID で一意、順序は意味を持たない）
    pub tokens: Vec<Token>,
    /// 接続 ID → ユーザーの名簿
    pub users: HashMap<ConnectionId, User>,
    next_message_seq: u64,
    next_token_seq: u64,
}

impl Room {
    /// デフォルト状態のルームを作成
    ///
    /// システムからのウェルカムメッセージ 1 件とシードトークン 2 体を持ち、
    /// 名簿は空の状態で始まります。
    ///
    /// # Arguments
    ///
    /// * `key` - ルームキー
    /// * `created_at` - 作成時刻
    /// * `clock_time` - ウェルカムメッセージに表示する "HH:MM" 時刻
    pub fn seeded(key: RoomKey, created_at: Timestamp, clock_time: String) -> Self {
        let messages = vec![ChatMessage {
            id: "system-1".to_string(),
            sender: "System".to_string(),
            text: "セッション開始！".to_string(),
            timestamp: clock_time,
            channel: Channel::Main,
            color: Some("#888".to_string()),
            expression: None,
        }];
        let tokens = vec![
            Token {
                id: "token-1".to_string(),
                name: "Hero".to_string(),
                x: 200.0,
                y: 200.0,
                color: "#3b82f6".to_string(),
            },
            Token {
                id: "token-2".to_string(),
                name: "Orc".to_string(),
                x: 280.0,
                y: 200.0,
                color: "#ef4444".to_string(),
            },
        ];

        Self {
            key,
            created_at,
            messages,
            tokens,
            users: HashMap::new(),
            next_message_seq: 1,
            // token-1 / token-2 はシード済み
            next_token_seq: 3,
        }
    }

    /// メッセージに ID を採番してログへ追記し、完成したメッセージを返す
    pub fn append_message(&mut self, draft: MessageDraft, timestamp: String) -> ChatMessage {
        let message = ChatMessage {
            id: format!("msg-{}", self.next_message_seq),
            sender: draft.sender,
            text: draft.text,
            timestamp,
            channel: draft.channel,
            color: draft.color,
            expression: draft.expression,
        };
        self.next_message_seq += 1;
        self.messages.push(message.clone());
        message
    }

    /// トークンの座標を更新する
    ///
    /// ID が見つからない場合は状態を変えずに `false` を返します
    /// （未知のトークンへの移動は異常系ではなく、単に無視されます）。
    pub fn move_token(&mut self, token_id: &str, x: f64, y: f64) -> bool {
        match self.tokens.iter_mut().find(|t| t.id == token_id) {
            Some(token) => {
                token.x = x;
                token.y = y;
                true
            }
            None => false,
        }
    }

    /// トークンに ID を採番して追加し、完成したトークンを返す
    pub fn add_token(&mut self, draft: TokenDraft) -> Token {
        let token = Token {
            id: format!("token-{}", self.next_token_seq),
            name: draft.name.unwrap_or_else(|| DEFAULT_TOKEN_NAME.to_string()),
            x: draft.x,
            y: draft.y,
            color: draft.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        };
        self.next_token_seq += 1;
        self.tokens.push(token.clone());
        token
    }

    /// 接続 ID に対応するユーザーを登録（再参加時は上書き）
    pub fn upsert_user(&mut self, conn_id: ConnectionId, user: User) {
        self.users.insert(conn_id, user);
    }

    /// 接続 ID に対応するユーザーを削除し、削除されたユーザーを返す
    pub fn remove_user(&mut self, conn_id: &ConnectionId) -> Option<User> {
        self.users.remove(conn_id)
    }

    /// 名簿のユーザー一覧を取得（接続 ID 順でソート済み）
    pub fn user_list(&self) -> Vec<User> {
        let mut entries: Vec<(&ConnectionId, &User)> = self.users.iter().collect();
        // Sort by connection id for consistent ordering
        entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        entries.into_iter().map(|(_, user)| user.clone()).collect()
    }

    /// ルームに参加中の接続 ID 一覧を取得（ソート済み）
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.users.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    /// 名簿が空かどうか
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
