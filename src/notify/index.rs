//! Subscription index: bin id to subscribed observers.
//!
//! The inverse of each [`super::Observer`]'s subscription set. Entries are
//! created on first subscription and removed as soon as they become empty.

use std::collections::{HashMap, HashSet};

use crate::domain::{BinId, ObserverId};

/// Map of bin id to the observers subscribed to it.
#[derive(Debug, Default)]
pub struct SubscriptionIndex {
    bins: HashMap<BinId, HashSet<ObserverId>>,
}

impl SubscriptionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `observer` to the subscribers of `bin`. Returns `true` if it was
    /// not already present.
    pub fn insert(&mut self, bin: &BinId, observer: ObserverId) -> bool {
        self.bins.entry(bin.clone()).or_default().insert(observer)
    }

    /// Removes `observer` from the subscribers of `bin`, dropping the entry
    /// once empty. Returns `true` if it was present.
    pub fn remove(&mut self, bin: &BinId, observer: ObserverId) -> bool {
        let Some(subscribers) = self.bins.get_mut(bin) else {
            return false;
        };
        let removed = subscribers.remove(&observer);
        if subscribers.is_empty() {
            self.bins.remove(bin);
        }
        removed
    }

    /// Returns a copy of the subscriber set of `bin` (possibly empty).
    #[must_use]
    pub fn subscribers_of(&self, bin: &BinId) -> HashSet<ObserverId> {
        self.bins.get(bin).cloned().unwrap_or_default()
    }

    /// Iterates over the subscribers of `bin` without copying.
    pub fn subscribers(&self, bin: &BinId) -> impl Iterator<Item = ObserverId> + '_ {
        self.bins.get(bin).into_iter().flatten().copied()
    }

    /// Returns `true` if `bin` has an entry.
    #[must_use]
    pub fn contains_bin(&self, bin: &BinId) -> bool {
        self.bins.contains_key(bin)
    }

    /// Returns the number of bins with at least one subscriber.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Returns `true` if no bin has subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
