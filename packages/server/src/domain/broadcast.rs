//! 配信スコープの決定ロジック
//!
//! イベント種別ごとの配信先は以下の 3 種類に分かれます:
//!
//! - `Reply`: 発信元の接続のみ（例: join 直後の room-state）
//! - `Relay`: 発信元を除くルーム内の全接続（例: user-joined, token-moved）
//! - `Announce`: 発信元を含むルーム内の全接続（例: chat-message, token-added）
//!
//! Relay と Announce の使い分けは意図的な設計です。ID をリレーが採番する
//! イベントは送信者にも完成形を届ける必要があるため Announce、送信者が
//! すでに結果を持っているイベントは Relay になります。

use super::value_object::ConnectionId;

/// 配信スコープ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryScope {
    /// 発信元の接続のみ
    Reply,
    /// 発信元を除くルームの全メンバー
    Relay,
    /// 発信元を含むルームの全メンバー
    Announce,
}

/// 配信先の接続 ID リストを求める
///
/// # Arguments
///
/// * `member_ids` - ルームに参加中の接続 ID 一覧
/// * `origin` - イベント発信元の接続 ID
/// * `scope` - 配信スコープ
pub fn delivery_targets(
    member_ids: &[ConnectionId],
    origin: &ConnectionId,
    scope: DeliveryScope,
) -> Vec<ConnectionId> {
    match scope {
        DeliveryScope::Reply => vec![origin.clone()],
        DeliveryScope::Relay => member_ids
            .iter()
            .filter(|id| *id != origin)
            .cloned()
            .collect(),
        DeliveryScope::Announce => member_ids.to_vec(),
    }
}
