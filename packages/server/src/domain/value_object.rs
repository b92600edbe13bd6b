//! Value Object 定義
//!
//! ドメイン層で使う小さな不変値。ID はすべてリレー側で採番されるため、
//! クライアント入力のバリデーションはここでは行いません（欠損時は
//! デフォルト値で補う方針。→ `infrastructure::dto::conversion`）。

use serde::{Deserialize, Serialize};

/// ルームを一意に識別するキー
///
/// クライアントが `join-room` で指定する任意の文字列。未指定の場合は
/// `"default"` にフォールバックします。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomKey(String);

impl RoomKey {
    /// デフォルトのルームキー
    pub const DEFAULT: &'static str = "default";

    pub fn new(key: String) -> Self {
        Self(key)
    }

    /// クライアント入力から RoomKey を作成（未指定は "default"）
    pub fn or_default(key: Option<String>) -> Self {
        match key {
            Some(k) if !k.is_empty() => Self(k),
            _ => Self(Self::DEFAULT.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 接続を一意に識別する ID
///
/// トランスポート接続ごとにリレーが採番します。表示名ではなく接続 ID で
/// ユーザーを管理するため、同じ表示名の接続が複数あっても区別できます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ConnectionId の採番ファクトリ
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// 新しい ConnectionId を生成（UUID v4）
    pub fn generate() -> ConnectionId {
        ConnectionId(uuid::Uuid::new_v4().to_string())
    }
}

/// Unix タイムスタンプ（JST、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
