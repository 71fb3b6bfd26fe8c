//! WebSocket transport: upgrade handler and per-connection loop.
//!
//! The endpoint at `/ws` streams [`crate::domain::BinEvent`]s to observers
//! and accepts `SUBSCRIBE` / `UNSUBSCRIBE` control frames. All state lives
//! in [`crate::notify`]; this layer only moves frames between the socket
//! and a [`crate::notify::Session`].

pub mod connection;
pub mod handler;
