//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::domain::BinStore;
use crate::notify::NotificationHub;
use crate::service::BinService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Bin service for all business logic.
    pub bin_service: Arc<BinService>,
    /// Notification hub for WebSocket observers.
    pub hub: NotificationHub,
}

impl AppState {
    /// Wires an empty store and a fresh hub according to `config`.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        let hub = NotificationHub::new(config.outbound_buffer);
        let bin_service = BinService::new(Arc::new(BinStore::new()), hub.clone(), config);
        Self {
            bin_service: Arc::new(bin_service),
            hub,
        }
    }
}
