//! UseCase: ルーム退出（切断）処理
//!
//! 接続が切れたとき、セッションがルームに参加していれば名簿から
//! そのエントリだけを削除し、残りのメンバーへ user-left を配信します。
//! ルームが空になっても履歴は保持されます（記録だけ残す）。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DeliveryScope, EventPusher, PushError, RemovedUser, RoomKey, RoomRegistry,
    delivery_targets,
};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Registry（ルームテーブルの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// ルーム退出を実行
    ///
    /// セッションが未参加、またはルーム・名簿エントリが存在しない場合は
    /// `None`。成功時は削除されたユーザーと削除後の名簿を返します。
    pub async fn execute(
        &self,
        room: Option<&RoomKey>,
        conn_id: &ConnectionId,
    ) -> Option<RemovedUser> {
        let key = room?;

        let removed = self.registry.remove_user(key, conn_id).await?;

        tracing::info!(
            "[{}] {} left ({} users)",
            key,
            removed.user.name,
            removed.users.len()
        );
        if removed.room_now_empty {
            // ルームは削除せず保持する（再参加で履歴が戻る）
            tracing::info!("[{}] Room is now empty", key);
        }

        Some(removed)
    }

    /// 残りのメンバーへ user-left を配信
    ///
    /// 退出者の接続はすでに閉じているため、配信先は残りのメンバーのみです。
    pub async fn relay_user_left(
        &self,
        origin: &ConnectionId,
        member_ids: &[ConnectionId],
        json: &str,
    ) -> Result<(), PushError> {
        let targets = delivery_targets(member_ids, origin, DeliveryScope::Relay);
        self.pusher.broadcast(targets, json).await
    }
}
