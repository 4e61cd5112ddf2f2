//! Real-time presence and messaging subsystem for the peer support chat.
//!
//! Tracks which client-asserted identity is bound to which WebSocket
//! connection, routes public (broadcast) and private (directed) messages
//! between live connections, and persists a best-effort copy of every routed
//! message to a relational store without blocking delivery.

pub mod common;
pub mod domain;
pub mod server;
pub mod store;
