//! UseCase: トークン追加処理
//!
//! トークン ID はリレーが採番するため、追加した本人にも完成形を
//! 届ける必要があります（Announce スコープ）。

use std::sync::Arc;

use crate::domain::{
    AcceptedToken, ConnectionId, DeliveryScope, EventPusher, PushError, RoomKey, RoomRegistry,
    TokenDraft, delivery_targets,
};

/// トークン追加のユースケース
pub struct AddTokenUseCase {
    /// Registry（ルームテーブルの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl AddTokenUseCase {
    /// 新しい AddTokenUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// トークン追加を実行
    ///
    /// セッションが未参加、またはルームが存在しない場合は `None`。
    pub async fn execute(
        &self,
        room: Option<&RoomKey>,
        draft: TokenDraft,
    ) -> Option<AcceptedToken> {
        let key = room?;

        let accepted = self.registry.add_token(key, draft).await?;

        tracing::info!("[{}] token '{}' added", key, accepted.token.name);

        Some(accepted)
    }

    /// 追加した本人を含む全メンバーへ token-added を配信
    pub async fn announce_token_added(
        &self,
        origin: &ConnectionId,
        member_ids: &[ConnectionId],
        json: &str,
    ) -> Result<(), PushError> {
        let targets = delivery_targets(member_ids, origin, DeliveryScope::Announce);
        self.pusher.broadcast(targets, json).await
    }
}
