//! UseCase 層のエラー定義
//!
//! join 以外のイベントにはエラーパスがありません。ガードに当たった
//! イベントは黙って捨てられます（プロトコルに否定応答のチャンネルが
//! 無いため）。

use thiserror::Error;

/// ルーム参加のエラー
///
/// 参加自体は全てのキーに対して成功します。失敗しうるのは参加直後の
/// room-state の返信だけです。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinRoomError {
    /// 参加者への room-state 送信に失敗した
    #[error("failed to deliver room state: {0}")]
    ReplyFailed(String),
}
