//! # request-bin
//!
//! Create named bins that capture any HTTP request sent to them, and watch
//! the captures arrive live over a WebSocket.
//!
//! The heart of the crate is the [`notify`] core, which multiplexes bin
//! events to many concurrently connected observers, each subscribed to a
//! subset of bins.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST + capture handlers (api/)
//!     ├── WS transport (ws/)
//!     │
//!     ├── BinService (service/)
//!     ├── NotificationHub (notify/)
//!     │     ├── ObserverRegistry
//!     │     ├── SubscriptionIndex
//!     │     ├── publish (dispatcher)
//!     │     └── Session (lifecycle)
//!     │
//!     └── BinStore (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod openapi;
pub mod server;
pub mod service;
pub mod ws;
