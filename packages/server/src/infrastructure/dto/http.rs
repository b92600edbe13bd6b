//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// ルーム概要（GET /api/rooms）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub key: String,
    pub user_count: usize,
    pub message_count: usize,
    pub token_count: usize,
    /// RFC 3339 形式の作成時刻（JST）
    pub created_at: String,
}
