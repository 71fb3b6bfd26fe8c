//! Event routing and delivery.
//!
//! [`NotificationHub::publish`] serializes a [`BinEvent`] once and enqueues
//! the frame on every observer in scope. Enqueueing never waits: a full or
//! closed outbound channel evicts that observer instead of slowing the
//! publisher or the other observers.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::error::TrySendError;

use super::{Frame, NotificationHub, Observer};
use crate::domain::{BinEvent, BinId, ObserverId};

/// Who receives an untargeted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience<'a> {
    /// Only observers subscribed to the bin.
    Subscribers(&'a BinId),
    /// Every registered observer.
    Everyone,
}

impl<'a> Audience<'a> {
    /// Routing policy for untargeted events.
    ///
    /// Request captures and bin updates are bin-scoped. Creations and
    /// deletions are catalog events and go to everyone.
    #[must_use]
    pub fn of(event: &'a BinEvent) -> Self {
        match event {
            BinEvent::RequestReceived { bin, .. } | BinEvent::BinUpdated { bin } => {
                Self::Subscribers(&bin.id)
            }
            BinEvent::BinCreated { .. } | BinEvent::BinDeleted { .. } | BinEvent::Connected { .. } => {
                Self::Everyone
            }
        }
    }
}

/// Why a frame could not be enqueued for an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryFailure {
    /// The observer's outbound buffer is full.
    #[error("outbound buffer full")]
    Full,
    /// The transport stopped draining the channel.
    #[error("outbound channel closed")]
    Closed,
}

/// Serializes an event into a shareable frame.
pub(super) fn encode(event: &BinEvent) -> Option<Frame> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Arc::from(json)),
        Err(err) => {
            tracing::error!(event_type = event.event_type_str(), %err, "failed to serialize event");
            None
        }
    }
}

pub(super) fn deliver(observer: &Observer, frame: &Frame) -> Result<(), DeliveryFailure> {
    observer
        .outbound()
        .try_send(Arc::clone(frame))
        .map_err(|err| match err {
            TrySendError::Full(_) => DeliveryFailure::Full,
            TrySendError::Closed(_) => DeliveryFailure::Closed,
        })
}

impl NotificationHub {
    /// Publishes an event.
    ///
    /// With `target` set, only that observer receives it (silently dropped if
    /// the observer is gone). Otherwise the [`Audience`] policy decides.
    ///
    /// Returns the number of observers the frame was enqueued for. Never
    /// fails: observers whose channel is full or closed are evicted.
    pub async fn publish(&self, event: &BinEvent, target: Option<ObserverId>) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };

        let mut delivered = 0_usize;
        let mut failed = Vec::new();
        {
            let registry = self.inner().registry.read().await;
            let mut attempt = |observer: &Observer| match deliver(observer, &frame) {
                Ok(()) => delivered = delivered.saturating_add(1),
                Err(failure) => failed.push((observer.id(), observer.connected_at(), failure)),
            };

            match target {
                Some(id) => match registry.lookup(id) {
                    Some(observer) if observer.is_open() => attempt(observer),
                    Some(observer) => {
                        tracing::trace!(observer_id = %id, "target channel closed, dropping event");
                        failed.push((id, observer.connected_at(), DeliveryFailure::Closed));
                    }
                    None => {
                        tracing::trace!(observer_id = %id, "target observer gone, dropping event");
                    }
                },
                None => match Audience::of(event) {
                    Audience::Everyone => registry.iter().for_each(&mut attempt),
                    Audience::Subscribers(bin) => {
                        let index = self.inner().index.read().await;
                        index
                            .subscribers(bin)
                            .filter_map(|id| registry.lookup(id))
                            .for_each(&mut attempt);
                    }
                },
            }
        }

        for (id, connected_at, failure) in failed {
            let connected_secs = (Utc::now() - connected_at).num_seconds();
            tracing::warn!(
                observer_id = %id,
                %failure,
                connected_secs,
                "evicting observer after failed delivery"
            );
            let _ = self.unregister(id).await;
        }

        tracing::trace!(
            event_type = event.event_type_str(),
            bin_id = ?event.bin_id(),
            delivered,
            "event published"
        );
        delivered
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Bin, CapturedRequest, NewRequest};
    use crate::notify::Registration;

    fn request_received(bin_id: &str) -> BinEvent {
        let request = CapturedRequest::capture(NewRequest::default());
        let bin = Bin::with_id(BinId::from(bin_id), "hooks").with_request(request.clone());
        BinEvent::RequestReceived { bin, request }
    }

    fn bin_created() -> BinEvent {
        BinEvent::BinCreated {
            bin: Bin::new("new"),
        }
    }

    fn frame_type(frame: &Frame) -> String {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(frame) else {
            panic!("frame is not JSON");
        };
        value["type"].as_str().unwrap_or_default().to_string()
    }

    fn drain(reg: &mut Registration) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Ok(frame) = reg.outbound.try_recv() {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn routing_policy_by_tag() {
        let created = bin_created();
        assert_eq!(Audience::of(&created), Audience::Everyone);

        let deleted = BinEvent::BinDeleted {
            bin_id: BinId::from("x"),
        };
        assert_eq!(Audience::of(&deleted), Audience::Everyone);

        let received = request_received("x");
        assert_eq!(Audience::of(&received), Audience::Subscribers(&BinId::from("x")));

        let updated = BinEvent::BinUpdated {
            bin: Bin::with_id(BinId::from("y"), "y"),
        };
        assert_eq!(Audience::of(&updated), Audience::Subscribers(&BinId::from("y")));
    }

    #[tokio::test]
    async fn request_received_reaches_only_bin_subscribers() {
        let hub = NotificationHub::new(8);
        let mut o1 = hub.register().await;
        let mut o2 = hub.register().await;
        let mut o3 = hub.register().await;
        hub.subscribe(&BinId::from("bin-x"), o1.id).await;
        hub.subscribe(&BinId::from("bin-c"), o3.id).await;

        let delivered = hub.publish(&request_received("bin-x"), None).await;
        assert_eq!(delivered, 1);

        let frames = drain(&mut o1);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames.first().map(frame_type).as_deref(), Some("REQUEST_RECEIVED"));
        assert!(drain(&mut o2).is_empty());
        assert!(drain(&mut o3).is_empty());
    }

    #[tokio::test]
    async fn bin_updated_is_bin_scoped() {
        let hub = NotificationHub::new(8);
        let mut watcher = hub.register().await;
        let mut bystander = hub.register().await;
        let bin = Bin::new("hooks");
        hub.subscribe(&bin.id, watcher.id).await;

        hub.publish(&BinEvent::BinUpdated { bin }, None).await;
        assert_eq!(drain(&mut watcher).len(), 1);
        assert!(drain(&mut bystander).is_empty());
    }

    #[tokio::test]
    async fn bin_created_reaches_everyone() {
        let hub = NotificationHub::new(8);
        let mut subscribed = hub.register().await;
        let mut idle = hub.register().await;
        hub.subscribe(&BinId::from("bin-x"), subscribed.id).await;

        assert_eq!(hub.publish(&bin_created(), None).await, 2);
        assert_eq!(drain(&mut subscribed).len(), 1);
        let frames = drain(&mut idle);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames.first().map(frame_type).as_deref(), Some("BIN_CREATED"));
    }

    #[tokio::test]
    async fn bin_deleted_is_broadcast() {
        let hub = NotificationHub::new(8);
        let mut a = hub.register().await;
        let mut b = hub.register().await;
        hub.subscribe(&BinId::from("gone"), a.id).await;

        let event = BinEvent::BinDeleted {
            bin_id: BinId::from("gone"),
        };
        assert_eq!(hub.publish(&event, None).await, 2);
        assert_eq!(drain(&mut a).len(), 1);
        assert_eq!(drain(&mut b).len(), 1);
    }

    #[tokio::test]
    async fn targeted_publish_reaches_only_target() {
        let hub = NotificationHub::new(8);
        let mut target = hub.register().await;
        let mut other = hub.register().await;

        assert_eq!(hub.publish(&bin_created(), Some(target.id)).await, 1);
        assert_eq!(drain(&mut target).len(), 1);
        assert!(drain(&mut other).is_empty());
    }

    #[tokio::test]
    async fn targeted_publish_to_vanished_observer_is_silent() {
        let hub = NotificationHub::new(8);
        let gone = hub.register().await;
        let mut other = hub.register().await;
        let _ = hub.unregister(gone.id).await;

        assert_eq!(hub.publish(&bin_created(), Some(gone.id)).await, 0);
        assert!(drain(&mut other).is_empty());
    }

    #[tokio::test]
    async fn targeted_publish_to_closed_channel_evicts_target() {
        let hub = NotificationHub::new(8);
        let closed = hub.register().await;
        let mut other = hub.register().await;
        hub.subscribe(&BinId::from("bin-x"), closed.id).await;
        drop(closed.outbound);

        assert_eq!(hub.publish(&bin_created(), Some(closed.id)).await, 0);
        assert!(!hub.is_registered(closed.id).await);
        assert!(hub.subscribers_of(&BinId::from("bin-x")).await.is_empty());
        assert!(drain(&mut other).is_empty());
    }

    #[tokio::test]
    async fn closed_channel_evicts_without_affecting_others() {
        let hub = NotificationHub::new(8);
        let closed = hub.register().await;
        let mut healthy = hub.register().await;
        let bin = BinId::from("bin-x");
        hub.subscribe(&bin, closed.id).await;
        hub.subscribe(&bin, healthy.id).await;
        drop(closed.outbound);

        assert_eq!(hub.publish(&request_received("bin-x"), None).await, 1);
        assert_eq!(drain(&mut healthy).len(), 1);
        assert!(!hub.is_registered(closed.id).await);
        assert_eq!(hub.subscribers_of(&bin).await.len(), 1);
    }

    #[tokio::test]
    async fn full_channel_evicts_slow_observer() {
        let hub = NotificationHub::new(1);
        let mut slow = hub.register().await;

        assert_eq!(hub.publish(&bin_created(), None).await, 1);
        assert_eq!(hub.publish(&bin_created(), None).await, 0);
        assert!(!hub.is_registered(slow.id).await);

        // The buffered frame is still drained, then the channel ends.
        assert!(slow.outbound.recv().await.is_some());
        assert!(slow.outbound.recv().await.is_none());
    }

    #[tokio::test]
    async fn per_bin_order_is_preserved() {
        let hub = NotificationHub::new(16);
        let mut watcher = hub.register().await;
        hub.subscribe(&BinId::from("bin-x"), watcher.id).await;

        let first = request_received("bin-x");
        let second = BinEvent::BinUpdated {
            bin: Bin::with_id(BinId::from("bin-x"), "renamed"),
        };
        hub.publish(&first, None).await;
        hub.publish(&second, None).await;

        let types: Vec<String> = drain(&mut watcher).iter().map(frame_type).collect();
        assert_eq!(types, vec!["REQUEST_RECEIVED", "BIN_UPDATED"]);
    }

    #[tokio::test]
    async fn publish_without_observers_returns_zero() {
        let hub = NotificationHub::new(8);
        assert_eq!(hub.publish(&bin_created(), None).await, 0);
        assert_eq!(hub.publish(&request_received("x"), None).await, 0);
    }
}
