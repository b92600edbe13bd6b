//! UseCase: チャットメッセージ送信処理
//!
//! セッションが参加済みであることをガードし、メッセージ ID と
//! タイムスタンプを採番してログへ追記、送信者を含む全メンバーへ
//! 配信します。ID はリレーが採番するため、送信者にも完成形を
//! 届ける必要があります（Announce スコープ）。

use std::sync::Arc;

use taku_shared::time::{Clock, timestamp_to_clock_time};

use crate::domain::{
    AcceptedMessage, ConnectionId, DeliveryScope, EventPusher, MessageDraft, PushError,
    RoomKey, RoomRegistry, delivery_targets,
};

/// チャットメッセージ送信のユースケース
pub struct SendChatMessageUseCase {
    /// Registry（ルームテーブルの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// EventPusher（イベント配信の抽象化）
    pusher: Arc<dyn EventPusher>,
    /// タイムスタンプ採番に使うクロック
    clock: Arc<dyn Clock>,
}

impl SendChatMessageUseCase {
    /// 新しい SendChatMessageUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        pusher: Arc<dyn EventPusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// セッションがルームに参加していない場合、またはルームが存在しない
    /// 場合は `None`（イベントは黙って捨てられる）。
    ///
    /// # Arguments
    ///
    /// * `room` - セッションが参加中のルームキー（未参加なら None）
    /// * `draft` - ID・タイムスタンプ採番前のメッセージ
    pub async fn execute(
        &self,
        room: Option<&RoomKey>,
        draft: MessageDraft,
    ) -> Option<AcceptedMessage> {
        let key = room?;

        let timestamp = timestamp_to_clock_time(self.clock.now_jst_millis());
        let accepted = self.registry.append_message(key, draft, timestamp).await?;

        tracing::info!(
            "[{}] {}: {}",
            key,
            accepted.message.sender,
            truncate(&accepted.message.text, 30)
        );

        Some(accepted)
    }

    /// 送信者を含む全メンバーへ chat-message を配信
    pub async fn announce_message(
        &self,
        origin: &ConnectionId,
        member_ids: &[ConnectionId],
        json: &str,
    ) -> Result<(), PushError> {
        let targets = delivery_targets(member_ids, origin, DeliveryScope::Announce);
        self.pusher.broadcast(targets, json).await
    }
}

/// ログ出力用にテキストを切り詰める
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
