//! Domain layer: bins, captured requests, events, and bin storage.
//!
//! This module contains the server-side domain model: identifiers for bins
//! and observers, the immutable [`Bin`] and [`CapturedRequest`] values, the
//! [`BinEvent`] pushed to observers, and the in-memory [`BinStore`].

pub mod bin;
pub mod bin_event;
pub mod bin_id;
pub mod bin_store;
pub mod observer_id;
pub mod request;

pub use bin::Bin;
pub use bin_event::BinEvent;
pub use bin_id::BinId;
pub use bin_store::BinStore;
pub use observer_id::ObserverId;
pub use request::{CapturedRequest, NewRequest};
