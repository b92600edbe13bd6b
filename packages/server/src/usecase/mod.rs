//! UseCase layer: one use case per inbound event kind, plus room listing.

pub mod add_token;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod list_rooms;
pub mod move_token;
pub mod send_chat_message;

pub use add_token::AddTokenUseCase;
pub use error::JoinRoomError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use move_token::MoveTokenUseCase;
pub use send_chat_message::SendChatMessageUseCase;
