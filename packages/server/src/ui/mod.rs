//! UI layer: axum router, WebSocket/HTTP handlers and server wiring.

pub mod handler;
pub mod server;
pub mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
