//! Bin service: orchestrates bin operations and publishes events.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::domain::{Bin, BinEvent, BinId, BinStore, CapturedRequest, NewRequest};
use crate::error::AppError;
use crate::notify::NotificationHub;

/// Orchestration layer for all bin operations.
///
/// Stateless coordinator: owns references to [`BinStore`] for state and
/// [`NotificationHub`] for event delivery. Every mutation follows the
/// pattern: validate → update store → publish event → return snapshot.
/// Publishing is fire-and-forget and never fails the operation.
#[derive(Debug, Clone)]
pub struct BinService {
    store: Arc<BinStore>,
    hub: NotificationHub,
    default_name: String,
    max_name_len: usize,
}

impl BinService {
    /// Creates a new `BinService`.
    #[must_use]
    pub fn new(store: Arc<BinStore>, hub: NotificationHub, config: &ServerConfig) -> Self {
        Self {
            store,
            hub,
            default_name: config.default_bin_name.clone(),
            max_name_len: config.max_bin_name_len,
        }
    }

    /// Returns a reference to the inner [`NotificationHub`].
    #[must_use]
    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// Returns a reference to the inner [`BinStore`].
    #[must_use]
    pub fn store(&self) -> &Arc<BinStore> {
        &self.store
    }

    /// Creates a new bin and announces it to every observer.
    ///
    /// A missing or blank name falls back to the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if the name is too long.
    pub async fn create_bin(&self, name: Option<&str>) -> Result<Bin, AppError> {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self.validate_name(name)?,
            None => self.default_name.as_str(),
        };

        let bin = self.store.create(name).await;
        let _ = self
            .hub
            .publish(&BinEvent::BinCreated { bin: bin.clone() }, None)
            .await;

        tracing::info!(bin_id = %bin.id, name = %bin.name, "bin created");
        Ok(bin)
    }

    /// Returns a bin snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BinNotFound`] if the bin does not exist.
    pub async fn get_bin(&self, id: &BinId) -> Result<Bin, AppError> {
        self.store.get(id).await
    }

    /// Returns all bins in creation order.
    pub async fn list_bins(&self) -> Vec<Bin> {
        self.store.list().await
    }

    /// Renames a bin and notifies its subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] for a blank or too long name and
    /// [`AppError::BinNotFound`] if the bin does not exist.
    pub async fn rename_bin(&self, id: &BinId, name: &str) -> Result<Bin, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidRequest("bin name must not be empty".to_string()));
        }
        let name = self.validate_name(name)?;

        let bin = self.store.update(id, |current| current.renamed(name)).await?;
        let _ = self
            .hub
            .publish(&BinEvent::BinUpdated { bin: bin.clone() }, None)
            .await;

        tracing::info!(bin_id = %bin.id, name = %bin.name, "bin renamed");
        Ok(bin)
    }

    /// Deletes a bin and announces the deletion to every observer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BinNotFound`] if the bin does not exist; nothing
    /// is published in that case.
    pub async fn delete_bin(&self, id: &BinId) -> Result<(), AppError> {
        if !self.store.remove(id).await {
            return Err(AppError::BinNotFound(id.clone()));
        }
        let _ = self
            .hub
            .publish(&BinEvent::BinDeleted { bin_id: id.clone() }, None)
            .await;

        tracing::info!(bin_id = %id, "bin deleted");
        Ok(())
    }

    /// Captures a request into a bin and notifies the bin's subscribers.
    ///
    /// Returns the updated bin and the captured request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BinNotFound`] if the bin does not exist.
    pub async fn capture_request(
        &self,
        id: &BinId,
        data: NewRequest,
    ) -> Result<(Bin, CapturedRequest), AppError> {
        let request = CapturedRequest::capture(data);
        let bin = self
            .store
            .update(id, |current| current.with_request(request.clone()))
            .await?;

        let _ = self
            .hub
            .publish(
                &BinEvent::RequestReceived {
                    bin: bin.clone(),
                    request: request.clone(),
                },
                None,
            )
            .await;

        tracing::debug!(
            bin_id = %id,
            request_id = %request.id,
            method = %request.method,
            path = %request.path,
            "request captured"
        );
        Ok((bin, request))
    }

    /// Returns one captured request of a bin.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BinNotFound`] or [`AppError::RequestNotFound`].
    pub async fn get_request(
        &self,
        id: &BinId,
        request_id: uuid::Uuid,
    ) -> Result<CapturedRequest, AppError> {
        let bin = self.store.get(id).await?;
        bin.request(request_id)
            .cloned()
            .ok_or_else(|| AppError::RequestNotFound {
                bin_id: id.clone(),
                request_id,
            })
    }

    fn validate_name<'a>(&self, name: &'a str) -> Result<&'a str, AppError> {
        if name.chars().count() > self.max_name_len {
            return Err(AppError::InvalidRequest(format!(
                "bin name exceeds {} characters",
                self.max_name_len
            )));
        }
        Ok(name)
    }
}
