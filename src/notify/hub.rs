//! Shared notification state and the operations that mutate it.
//!
//! [`NotificationHub`] owns the [`ObserverRegistry`] and the
//! [`SubscriptionIndex`], each behind its own [`tokio::sync::RwLock`].
//!
//! # Lock ordering
//!
//! Any operation that needs both locks acquires the **registry first, then
//! the index**, and holds both until the pair is consistent again. Publishing
//! follows the same order with read locks. No lock is ever held across
//! socket I/O.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use super::dispatcher::{deliver, encode};
use super::{Frame, ObserverRegistry, SubscriptionIndex};
use crate::domain::{BinEvent, BinId, ObserverId};

/// Result of registering a new observer.
#[derive(Debug)]
pub struct Registration {
    /// Id assigned to the observer.
    pub id: ObserverId,
    /// Receiving end of the observer's outbound channel.
    pub outbound: mpsc::Receiver<Frame>,
}

/// Cloneable handle to the shared registry and index.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    inner: Arc<HubInner>,
}

#[derive(Debug)]
pub(super) struct HubInner {
    pub(super) registry: RwLock<ObserverRegistry>,
    pub(super) index: RwLock<SubscriptionIndex>,
    outbound_capacity: usize,
}

impl NotificationHub {
    /// Creates a hub whose observers get outbound channels of the given
    /// capacity.
    #[must_use]
    pub fn new(outbound_capacity: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                registry: RwLock::new(ObserverRegistry::new()),
                index: RwLock::new(SubscriptionIndex::new()),
                outbound_capacity: outbound_capacity.max(1),
            }),
        }
    }

    pub(super) fn inner(&self) -> &HubInner {
        &self.inner
    }

    /// Registers a new observer with no subscriptions and nothing queued.
    pub async fn register(&self) -> Registration {
        let (id, outbound) = self
            .inner
            .registry
            .write()
            .await
            .register(self.inner.outbound_capacity);
        tracing::debug!(observer_id = %id, "observer registered");
        Registration { id, outbound }
    }

    /// Registers a new observer and queues its `CONNECTED` acknowledgment.
    ///
    /// The ack is enqueued before the registry lock is released, so no
    /// broadcast can reach the observer ahead of it.
    pub async fn connect(&self) -> Registration {
        let mut registry = self.inner.registry.write().await;
        let (id, outbound) = registry.register(self.inner.outbound_capacity);
        let ack = encode(&BinEvent::Connected { client_id: id });
        if let (Some(observer), Some(frame)) = (registry.lookup(id), ack) {
            if let Err(failure) = deliver(observer, &frame) {
                tracing::warn!(observer_id = %id, %failure, "failed to queue CONNECTED ack");
            }
        }
        drop(registry);

        tracing::debug!(observer_id = %id, "observer registered");
        Registration { id, outbound }
    }

    /// Removes an observer and all of its index entries.
    ///
    /// Returns the bins it was subscribed to; empty for unknown ids, so
    /// repeated calls are harmless. Dropping the observer closes its
    /// outbound channel.
    pub async fn unregister(&self, id: ObserverId) -> HashSet<BinId> {
        let mut registry = self.inner.registry.write().await;
        let mut index = self.inner.index.write().await;
        let subscriptions = registry.unregister(id);
        for bin in &subscriptions {
            index.remove(bin, id);
        }
        subscriptions
    }

    /// Subscribes an observer to a bin.
    ///
    /// Idempotent. Returns `false` if the observer is not registered, in
    /// which case nothing changes.
    pub async fn subscribe(&self, bin: &BinId, id: ObserverId) -> bool {
        let mut registry = self.inner.registry.write().await;
        let Some(observer) = registry.lookup_mut(id) else {
            return false;
        };
        let mut index = self.inner.index.write().await;
        observer.subscriptions_mut().insert(bin.clone());
        index.insert(bin, id);
        true
    }

    /// Unsubscribes an observer from a bin.
    ///
    /// Idempotent. Returns `true` if a subscription was removed.
    pub async fn unsubscribe(&self, bin: &BinId, id: ObserverId) -> bool {
        let mut registry = self.inner.registry.write().await;
        let mut index = self.inner.index.write().await;
        let on_observer = registry
            .lookup_mut(id)
            .is_some_and(|observer| observer.subscriptions_mut().remove(bin));
        let on_index = index.remove(bin, id);
        on_observer || on_index
    }

    /// Returns the observers currently subscribed to `bin`.
    pub async fn subscribers_of(&self, bin: &BinId) -> HashSet<ObserverId> {
        self.inner.index.read().await.subscribers_of(bin)
    }

    /// Returns the subscriptions of an observer, or `None` if it is not
    /// registered.
    pub async fn subscriptions_of(&self, id: ObserverId) -> Option<HashSet<BinId>> {
        self.inner
            .registry
            .read()
            .await
            .lookup(id)
            .map(|observer| observer.subscriptions().clone())
    }

    /// Returns `true` if the observer is registered.
    pub async fn is_registered(&self, id: ObserverId) -> bool {
        self.inner.registry.read().await.lookup(id).is_some()
    }

    /// Returns the number of registered observers.
    pub async fn observer_count(&self) -> usize {
        self.inner.registry.read().await.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_OUTBOUND_BUFFER)
    }
}
