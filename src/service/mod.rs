//! Service layer: business logic orchestration.
//!
//! [`BinService`] coordinates bin operations on the
//! [`crate::domain::BinStore`] and publishes events through the
//! [`crate::notify::NotificationHub`].

pub mod bin_service;

pub use bin_service::BinService;
