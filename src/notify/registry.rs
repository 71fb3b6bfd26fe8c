//! Observer registry: connected observers and their subscriptions.
//!
//! [`ObserverRegistry`] is plain data with no locking of its own; the
//! [`super::NotificationHub`] owns it behind a lock and keeps it consistent
//! with the [`super::SubscriptionIndex`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::Frame;
use crate::domain::{BinId, ObserverId};

/// One connected observer.
///
/// Owned exclusively by the registry. The outbound sender is the only way
/// frames reach the connection; dropping the observer closes the channel.
#[derive(Debug)]
pub struct Observer {
    id: ObserverId,
    outbound: mpsc::Sender<Frame>,
    subscriptions: HashSet<BinId>,
    connected_at: DateTime<Utc>,
}

impl Observer {
    /// Returns the observer id.
    #[must_use]
    pub const fn id(&self) -> ObserverId {
        self.id
    }

    /// Returns the bins this observer is subscribed to.
    #[must_use]
    pub fn subscriptions(&self) -> &HashSet<BinId> {
        &self.subscriptions
    }

    /// Returns when the observer connected.
    #[must_use]
    pub const fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Returns `true` while the transport still drains the outbound channel.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    pub(super) fn outbound(&self) -> &mpsc::Sender<Frame> {
        &self.outbound
    }

    pub(super) fn subscriptions_mut(&mut self) -> &mut HashSet<BinId> {
        &mut self.subscriptions
    }
}

/// Map of observer id to [`Observer`].
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    observers: HashMap<ObserverId, Observer>,
}

impl ObserverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer with an empty subscription set and a fresh
    /// outbound channel of the given capacity (at least 1).
    ///
    /// Returns the new id and the receiving end of the channel, which the
    /// transport drains.
    pub fn register(&mut self, capacity: usize) -> (ObserverId, mpsc::Receiver<Frame>) {
        let mut id = ObserverId::new();
        while self.observers.contains_key(&id) {
            id = ObserverId::new();
        }
        let (outbound, receiver) = mpsc::channel(capacity.max(1));
        self.observers.insert(
            id,
            Observer {
                id,
                outbound,
                subscriptions: HashSet::new(),
                connected_at: Utc::now(),
            },
        );
        (id, receiver)
    }

    /// Removes an observer, returning the bins it was subscribed to.
    ///
    /// Unknown ids yield an empty set, so unregistering twice is harmless.
    pub fn unregister(&mut self, id: ObserverId) -> HashSet<BinId> {
        self.observers
            .remove(&id)
            .map(|observer| observer.subscriptions)
            .unwrap_or_default()
    }

    /// Looks up an observer by id.
    #[must_use]
    pub fn lookup(&self, id: ObserverId) -> Option<&Observer> {
        self.observers.get(&id)
    }

    pub(super) fn lookup_mut(&mut self, id: ObserverId) -> Option<&mut Observer> {
        self.observers.get_mut(&id)
    }

    /// Iterates over all registered observers.
    pub fn iter(&self) -> impl Iterator<Item = &Observer> {
        self.observers.values()
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
