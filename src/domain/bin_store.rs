//! In-memory bin storage.
//!
//! [`BinStore`] keeps every bin in a `HashMap` behind a single
//! [`tokio::sync::RwLock`]. Bins are values, so updates replace the stored
//! bin wholesale and readers always get an owned snapshot.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{Bin, BinId};
use crate::error::AppError;

/// Central store for all bins.
///
/// # Concurrency
///
/// - Reads run concurrently.
/// - Writes are serialized by the outer lock.
/// - Read-modify-write sequences go through [`BinStore::update`] so the
///   closure sees and replaces the latest value under one write lock.
#[derive(Debug, Default)]
pub struct BinStore {
    bins: RwLock<HashMap<BinId, Bin>>,
}

impl BinStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and stores a new empty bin, returning a snapshot of it.
    pub async fn create(&self, name: &str) -> Bin {
        let mut map = self.bins.write().await;
        let mut bin = Bin::new(name);
        while map.contains_key(&bin.id) {
            bin = Bin::new(name);
        }
        map.insert(bin.id.clone(), bin.clone());
        bin
    }

    /// Returns a snapshot of the bin with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BinNotFound`] if no such bin exists.
    pub async fn get(&self, id: &BinId) -> Result<Bin, AppError> {
        self.bins
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::BinNotFound(id.clone()))
    }

    /// Returns all bins ordered by creation time.
    pub async fn list(&self) -> Vec<Bin> {
        let map = self.bins.read().await;
        let mut bins: Vec<Bin> = map.values().cloned().collect();
        bins.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        bins
    }

    /// Applies `f` to the stored bin and stores the result, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BinNotFound`] if no such bin exists.
    pub async fn update<F>(&self, id: &BinId, f: F) -> Result<Bin, AppError>
    where
        F: FnOnce(&Bin) -> Bin,
    {
        let mut map = self.bins.write().await;
        let current = map
            .get_mut(id)
            .ok_or_else(|| AppError::BinNotFound(id.clone()))?;
        let next = f(current);
        *current = next.clone();
        Ok(next)
    }

    /// Removes a bin. Returns `true` if it existed.
    pub async fn remove(&self, id: &BinId) -> bool {
        self.bins.write().await.remove(id).is_some()
    }

    /// Returns the number of stored bins.
    pub async fn len(&self) -> usize {
        self.bins.read().await.len()
    }

    /// Returns `true` if the store holds no bins.
    pub async fn is_empty(&self) -> bool {
        self.bins.read().await.is_empty()
    }
}
