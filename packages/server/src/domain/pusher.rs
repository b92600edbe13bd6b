//! EventPusher trait 定義
//!
//! アウトバウンドイベント配信のインターフェース。UseCase 層はこの trait に
//! 依存し、WebSocket を使った具体的な実装は Infrastructure 層が提供します
//! （依存性の逆転）。
//!
//! 配信は fire-and-forget です。確認応答を待たず、個別の送信失敗は
//! ログに残して処理を続行します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::PushError;
use super::value_object::ConnectionId;

/// 接続ごとの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// アウトバウンドイベント配信のインターフェース
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// 接続を配信先として登録
    async fn register(&self, conn_id: ConnectionId, sender: PusherChannel);

    /// 接続を配信先から登録解除
    async fn unregister(&self, conn_id: &ConnectionId);

    /// 特定の接続へイベントを送信
    async fn push_to(&self, conn_id: &ConnectionId, content: &str) -> Result<(), PushError>;

    /// 複数の接続へイベントを配信（一部の送信失敗は許容）
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str)
    -> Result<(), PushError>;
}
