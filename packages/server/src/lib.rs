//! Room-scoped state synchronization relay for taku tabletop sessions.
//!
//! This library keeps the clients of a shared session (a "room") in agreement
//! about three mutable collections (a chat log, a set of positioned tokens,
//! and a roster of present users) and propagates every mutation to the other
//! room members over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
