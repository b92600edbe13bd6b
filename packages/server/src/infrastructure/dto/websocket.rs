//! WebSocket イベント DTO 定義
//!
//! ワイヤ上のイベントは `type` フィールドでタグ付けされた JSON です。
//! インバウンドイベントはトランスポート境界でこの列挙型にパースされ、
//! パースできないフレームはその場で捨てられます（ハンドラ内に
//! フォールバックを散らさないため、欠損フィールドの補完は
//! `conversion` モジュールに集約しています）。
//!
//! ID とタイムスタンプはリレーが採番するため、インバウンド側の
//! chat-message / token-add には含まれません。

use serde::{Deserialize, Serialize};

use crate::domain::entity::Channel;

/// join-room に添えられるユーザー情報（全フィールド任意）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDraftDto {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// クライアント → リレーのイベント
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// ルームへの参加要求
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: Option<String>,
        user: Option<UserDraftDto>,
    },
    /// チャットメッセージ（id / timestamp はリレー採番）
    ChatMessage {
        sender: String,
        text: String,
        channel: Channel,
        color: Option<String>,
        expression: Option<String>,
    },
    /// トークン移動
    #[serde(rename_all = "camelCase")]
    TokenMove { token_id: String, x: f64, y: f64 },
    /// トークン追加（id はリレー採番）
    TokenAdd {
        name: Option<String>,
        x: f64,
        y: f64,
        color: Option<String>,
    },
}

/// チャットメッセージ（完成形）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub timestamp: String,
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

/// トークン（完成形）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDto {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

/// ルームのユーザー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub name: String,
    pub color: String,
}

/// リレー → クライアントのイベント
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// ルームの全状態（join した本人にのみ送信）
    RoomState {
        messages: Vec<MessageDto>,
        tokens: Vec<TokenDto>,
        users: Vec<UserDto>,
    },
    /// ユーザー参加通知（参加者以外へ配信）
    UserJoined { name: String, users: Vec<UserDto> },
    /// ユーザー退出通知（退出者以外へ配信）
    UserLeft { name: String, users: Vec<UserDto> },
    /// 受理されたチャットメッセージ（送信者を含む全員へ配信）
    ChatMessage(MessageDto),
    /// トークン移動通知（移動した本人以外へ配信）
    #[serde(rename_all = "camelCase")]
    TokenMoved { token_id: String, x: f64, y: f64 },
    /// 受理されたトークン（追加した本人を含む全員へ配信）
    TokenAdded(TokenDto),
}
