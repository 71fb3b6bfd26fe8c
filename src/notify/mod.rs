//! Real-time notification core.
//!
//! Multiplexes [`crate::domain::BinEvent`]s to connected observers:
//!
//! - [`ObserverRegistry`] — connected observers and their subscriptions.
//! - [`SubscriptionIndex`] — bin id to subscribed observers.
//! - [`NotificationHub::publish`] — routing and non-blocking delivery.
//! - [`Session`] — per-connection lifecycle and control frames.
//!
//! The transport only ever sees an observer id, a [`Session`], and the
//! receiving end of the observer's outbound channel.

pub mod control;
pub mod dispatcher;
pub mod hub;
pub mod index;
pub mod lifecycle;
pub mod registry;

use std::sync::Arc;

pub use control::{ControlFrame, FrameError};
pub use dispatcher::{Audience, DeliveryFailure};
pub use hub::{NotificationHub, Registration};
pub use index::SubscriptionIndex;
pub use lifecycle::{ConnectionState, Session};
pub use registry::{Observer, ObserverRegistry};

/// A serialized event, shared between all observers it is delivered to.
pub type Frame = Arc<str>;
