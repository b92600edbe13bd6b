//! Infrastructure layer: concrete adapters for the domain ports and wire DTOs.

pub mod dto;
pub mod pusher;
pub mod registry;
