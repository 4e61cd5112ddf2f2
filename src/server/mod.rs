//! WebSocket presence-and-messaging server implementation.

pub mod events;
pub mod handler;
pub mod history;
pub mod registry;
pub mod router;
pub mod runner;
pub mod signal;
pub mod sink;
pub mod state;

pub use runner::{app, run_server};
pub use state::AppState;
