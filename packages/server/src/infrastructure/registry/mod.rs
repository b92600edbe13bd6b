//! RoomRegistry 実装
//!
//! 現在はインメモリ実装のみ。永続化が必要になった場合はここに
//! 別実装を追加します。

pub mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
