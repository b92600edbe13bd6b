//! RoomRegistry trait 定義
//!
//! ルームキー → Room のプロセス内テーブルへのインターフェース。
//! グローバル変数ではなく、所有されたインスタンスとして UseCase 層に
//! 渡されます（テストごとに独立したレジストリを構築できるように）。
//!
//! すべての操作は全域的です。未知のルームや未知のトークンを参照する
//! 操作は `None` を返すだけで、エラーにはなりません（プロトコルに
//! 否定応答のチャンネルが無いため、落としたイベントは黙って無視します）。

use async_trait::async_trait;

use super::entity::{ChatMessage, MessageDraft, Token, TokenDraft, User};
use super::value_object::{ConnectionId, RoomKey, Timestamp};

/// join 直後に参加者へ返すルームの全状態
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub messages: Vec<ChatMessage>,
    pub tokens: Vec<Token>,
    /// 名簿のユーザー一覧（接続 ID 順）
    pub users: Vec<User>,
    /// 参加中の接続 ID 一覧（配信先の計算に使う）
    pub member_ids: Vec<ConnectionId>,
}

/// 受理されたチャットメッセージ
#[derive(Debug, Clone)]
pub struct AcceptedMessage {
    /// ID・タイムスタンプ採番済みの完成したメッセージ
    pub message: ChatMessage,
    pub member_ids: Vec<ConnectionId>,
}

/// 座標更新が適用されたトークン移動
#[derive(Debug, Clone)]
pub struct MovedToken {
    pub member_ids: Vec<ConnectionId>,
}

/// 受理されたトークン追加
#[derive(Debug, Clone)]
pub struct AcceptedToken {
    /// ID 採番済みの完成したトークン
    pub token: Token,
    pub member_ids: Vec<ConnectionId>,
}

/// 名簿から削除されたユーザー
#[derive(Debug, Clone)]
pub struct RemovedUser {
    pub user: User,
    /// 削除後のユーザー一覧
    pub users: Vec<User>,
    /// 削除後に残っている接続 ID 一覧
    pub member_ids: Vec<ConnectionId>,
    /// この削除でルームが空になったか（ルーム自体は保持される）
    pub room_now_empty: bool,
}

/// HTTP API 向けのルーム概要
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub key: RoomKey,
    pub user_count: usize,
    pub message_count: usize,
    pub token_count: usize,
    pub created_at: Timestamp,
}

/// Room Registry trait
///
/// Room テーブルの唯一の所有者。check-then-insert（get-or-create）を含む
/// 各操作は 1 回のロック取得の中で完結し、同じキーへの同時 join が
/// ルームを二重に作ることはありません。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// ルームへの参加（ルームが無ければデフォルト状態で作成）
    ///
    /// 接続 ID に対応するユーザーを登録し、参加後のルーム全状態を返します。
    /// 全ての文字列キーに対して成功します。
    async fn join(&self, key: &RoomKey, conn_id: ConnectionId, user: User) -> RoomSnapshot;

    /// チャットメッセージに ID を採番してログへ追記
    ///
    /// ルームが存在しない場合は `None`（防御的な no-op）。
    async fn append_message(
        &self,
        key: &RoomKey,
        draft: MessageDraft,
        timestamp: String,
    ) -> Option<AcceptedMessage>;

    /// トークンの座標を更新
    ///
    /// ルームまたはトークンが存在しない場合は `None`。
    async fn move_token(
        &self,
        key: &RoomKey,
        token_id: &str,
        x: f64,
        y: f64,
    ) -> Option<MovedToken>;

    /// トークンに ID を採番して追加
    ///
    /// ルームが存在しない場合は `None`。
    async fn add_token(&self, key: &RoomKey, draft: TokenDraft) -> Option<AcceptedToken>;

    /// 接続 ID に対応するユーザーを名簿から削除
    ///
    /// ルームまたはユーザーが存在しない場合は `None`。名簿が空になっても
    /// ルームとその履歴は削除されません。
    async fn remove_user(&self, key: &RoomKey, conn_id: &ConnectionId) -> Option<RemovedUser>;

    /// 全ルームの概要一覧を取得
    async fn room_summaries(&self) -> Vec<RoomSummary>;
}
