//! Domain layer: entities, value objects and the ports the use cases depend on.

pub mod broadcast;
pub mod entity;
pub mod error;
pub mod pusher;
pub mod registry;
pub mod sequencer;
pub mod session;
pub mod value_object;

pub use broadcast::{DeliveryScope, delivery_targets};
pub use entity::{
    Channel, ChatMessage, JoinRequest, MessageDraft, Room, Token, TokenDraft, User,
};
pub use error::PushError;
pub use pusher::{EventPusher, PusherChannel};
pub use registry::{
    AcceptedMessage, AcceptedToken, MovedToken, RemovedUser, RoomRegistry, RoomSnapshot,
    RoomSummary,
};
pub use sequencer::RoomSequencer;
pub use session::Session;
pub use value_object::{ConnectionId, ConnectionIdFactory, RoomKey, Timestamp};
