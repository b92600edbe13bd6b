//! Conversion logic between DTOs and domain entities.
//!
//! インバウンドイベントの欠損フィールドはここで一括してデフォルト補完
//! されます（ハンドラ側にフォールバックを散らさない）。join-room の
//! 不正・欠損は拒否されず、必ずデフォルト値で成立します。

use taku_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::entity::{ANONYMOUS_NAME, DEFAULT_COLOR};
use crate::domain::{ChatMessage, JoinRequest, RoomKey, RoomSummary, Token, User};
use crate::infrastructure::dto::http::RoomSummaryDto;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

/// join-room イベントの内容をデフォルト補完して参加リクエストにする
pub fn to_join_request(room_id: Option<String>, user: Option<dto::UserDraftDto>) -> JoinRequest {
    let (name, color) = match user {
        Some(draft) => (draft.name, draft.color),
        None => (None, None),
    };

    JoinRequest {
        room_key: RoomKey::or_default(room_id),
        user: User {
            name: name.unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
            color: color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        },
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for dto::MessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id,
            sender: model.sender,
            text: model.text,
            timestamp: model.timestamp,
            channel: model.channel,
            color: model.color,
            expression: model.expression,
        }
    }
}

impl From<Token> for dto::TokenDto {
    fn from(model: Token) -> Self {
        Self {
            id: model.id,
            name: model.name,
            x: model.x,
            y: model.y,
            color: model.color,
        }
    }
}

impl From<User> for dto::UserDto {
    fn from(model: User) -> Self {
        Self {
            name: model.name,
            color: model.color,
        }
    }
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(model: RoomSummary) -> Self {
        Self {
            key: model.key.as_str().to_string(),
            user_count: model.user_count,
            message_count: model.message_count,
            token_count: model.token_count,
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
        }
    }
}
