//! ドメイン層のエラー定義

use thiserror::Error;

/// メッセージ配信のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PushError {
    /// 宛先の接続が登録されていない
    #[error("client not found: {0}")]
    ClientNotFound(String),
    /// 送信チャンネルへの書き込みに失敗した
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
