//! Server state and connection management.

use std::sync::Arc;

use crate::domain::{EventPusher, RoomSequencer};
use crate::usecase::{
    AddTokenUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase, MoveTokenUseCase,
    SendChatMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// SendChatMessageUseCase（チャット送信のユースケース）
    pub send_chat_message_usecase: Arc<SendChatMessageUseCase>,
    /// MoveTokenUseCase（トークン移動のユースケース）
    pub move_token_usecase: Arc<MoveTokenUseCase>,
    /// AddTokenUseCase（トークン追加のユースケース）
    pub add_token_usecase: Arc<AddTokenUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// EventPusher（接続の登録・登録解除に使う）
    pub event_pusher: Arc<dyn EventPusher>,
    /// ルーム単位の順序ガード（変更と配信の原子化に使う）
    pub sequencer: Arc<RoomSequencer>,
}
