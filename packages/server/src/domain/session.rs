//! 接続ごとのセッションコンテキスト
//!
//! 「この接続がどのルームにいるか」を覚えているのはこの値だけです。
//! トランスポート層自体はルームの概念を持たないため、接続タスクが
//! Session を所有し、各イベントのディスパッチ時に渡します。

use super::value_object::RoomKey;

/// 接続ごとのセッション状態
///
/// 接続時に空で作られ、join-room で埋まり、切断時に破棄されます。
#[derive(Debug, Clone, Default)]
pub struct Session {
    room_key: Option<RoomKey>,
    display_name: Option<String>,
}

impl Session {
    /// 未参加のセッションを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ルームへの参加を記録する
    pub fn join(&mut self, room_key: RoomKey, display_name: String) {
        self.room_key = Some(room_key);
        self.display_name = Some(display_name);
    }

    /// 参加中のルームキーを取得（未参加なら None）
    pub fn joined_room(&self) -> Option<&RoomKey> {
        self.room_key.as_ref()
    }

    /// 参加時に名乗った表示名を取得
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}
