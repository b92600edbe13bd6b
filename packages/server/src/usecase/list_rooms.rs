//! UseCase: ルーム一覧取得処理（HTTP API 向け）

use std::sync::Arc;

use crate::domain::{RoomRegistry, RoomSummary};

/// ルーム一覧取得のユースケース
pub struct ListRoomsUseCase {
    /// Registry（ルームテーブルの抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl ListRoomsUseCase {
    /// 新しい ListRoomsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 全ルームの概要一覧を取得（ルームキー順）
    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.registry.room_summaries().await
    }
}
