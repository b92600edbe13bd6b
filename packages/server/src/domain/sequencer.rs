//! ルーム単位のイベント順序付け
//!
//! 「配信順 = 受理順」の保証には、ID の採番（Registry のロック内）と
//! 配信チャンネルへの投入（ロック解放後）が他の送信者と交錯しないことが
//! 必要です。ディスパッチャはルームへの変更イベントを処理する間この
//! ガードを保持し、変更と配信をルーム単位で原子化します。
//!
//! ルームが異なればガードも独立しているため、ルーム間の並行性は
//! 損なわれません。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use super::value_object::RoomKey;

/// ルームごとの順序ガードのテーブル
///
/// Room と同様、一度作られたエントリはプロセスが生きている限り
/// 取り除かれません。
pub struct RoomSequencer {
    locks: Mutex<HashMap<RoomKey, Arc<Mutex<()>>>>,
}

impl RoomSequencer {
    /// 新しい RoomSequencer を作成
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// ルームの順序ガードを取得する
    ///
    /// 同じルームのガードを保持している処理があれば、それが終わるまで
    /// 待ちます。返されたガードを drop するまで、このルームの他の
    /// 変更イベントはブロックされます。
    pub async fn acquire(&self, key: &RoomKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

impl Default for RoomSequencer {
    fn default() -> Self {
        Self::new()
    }
}
