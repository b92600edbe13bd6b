//! UseCase: トークン移動処理
//!
//! 未知のトークン ID への移動は異常系ではなく、状態を変えずに黙って
//! 無視されます（削除済み・未同期のトークンを参照するイベントは
//! 正常な競合の範囲内）。移動した本人はすでに確定した座標を持って
//! いるため、配信先から除かれます（Relay スコープ）。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DeliveryScope, EventPusher, MovedToken, PushError, RoomKey, RoomRegistry,
    delivery_targets,
};

/// トークン移動のユースケース
pub struct MoveTokenUseCase {
    /// Registry（ルームテーブルの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl MoveTokenUseCase {
    /// 新しい MoveTokenUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// トークン移動を実行
    ///
    /// セッションが未参加、ルームが存在しない、またはトークン ID が
    /// 見つからない場合は `None`（状態は変化せず、配信も行われない）。
    pub async fn execute(
        &self,
        room: Option<&RoomKey>,
        token_id: &str,
        x: f64,
        y: f64,
    ) -> Option<MovedToken> {
        let key = room?;

        let moved = self.registry.move_token(key, token_id, x, y).await?;

        tracing::debug!("[{}] token '{}' moved to ({}, {})", key, token_id, x, y);

        Some(moved)
    }

    /// 移動した本人を除く全メンバーへ token-moved を配信
    pub async fn relay_token_moved(
        &self,
        origin: &ConnectionId,
        member_ids: &[ConnectionId],
        json: &str,
    ) -> Result<(), PushError> {
        let targets = delivery_targets(member_ids, origin, DeliveryScope::Relay);
        self.pusher.broadcast(targets, json).await
    }
}
