//! UseCase: ルーム参加処理
//!
//! ルームの解決（無ければデフォルト状態で作成）、名簿への登録、
//! 参加者本人への room-state 返信、他メンバーへの user-joined 配信を
//! 担当します。欠損した roomId・ユーザー情報は変換層でデフォルト補完
//! されるため、このユースケースに失敗パスはほぼありません。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DeliveryScope, EventPusher, JoinRequest, PushError, RoomRegistry, RoomSnapshot,
    delivery_targets,
};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（ルームテーブルの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// ルーム参加を実行
    ///
    /// ルームが無ければデフォルト状態で作成し、接続 ID に対応する
    /// ユーザーを名簿に登録して、参加後のルーム全状態を返します。
    ///
    /// # Arguments
    ///
    /// * `conn_id` - 参加する接続の ID
    /// * `request` - デフォルト補完済みの参加リクエスト
    pub async fn execute(&self, conn_id: ConnectionId, request: JoinRequest) -> RoomSnapshot {
        let snapshot = self
            .registry
            .join(&request.room_key, conn_id, request.user.clone())
            .await;

        tracing::info!(
            "[{}] {} joined ({} users)",
            request.room_key,
            request.user.name,
            snapshot.users.len()
        );

        snapshot
    }

    /// 参加者本人へ room-state を返信
    ///
    /// 履歴を持っていないのは参加者本人だけなので、配信先は発信元のみです。
    pub async fn reply_room_state(
        &self,
        conn_id: &ConnectionId,
        json: &str,
    ) -> Result<(), JoinRoomError> {
        self.pusher
            .push_to(conn_id, json)
            .await
            .map_err(|e: PushError| JoinRoomError::ReplyFailed(e.to_string()))
    }

    /// 他メンバーへ user-joined を配信
    ///
    /// 参加者本人は自分の参加を知っているため、配信先から除きます。
    pub async fn relay_user_joined(
        &self,
        origin: &ConnectionId,
        member_ids: &[ConnectionId],
        json: &str,
    ) -> Result<(), PushError> {
        let targets = delivery_targets(member_ids, origin, DeliveryScope::Relay);
        self.pusher.broadcast(targets, json).await
    }
}
