//! Per-connection lifecycle: connect, control frames, disconnect.
//!
//! A [`Session`] moves through `Connecting -> Connected -> Closed`. Cleanup
//! runs exactly once no matter how many paths signal the disconnect: an
//! explicit [`Session::close`], a concurrent second close, or the session
//! being dropped while still connected.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use super::{ControlFrame, Frame, NotificationHub, Registration};
use crate::domain::ObserverId;

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered, acknowledgment not yet sent.
    Connecting,
    /// Accepting control frames.
    Connected,
    /// Terminal. The observer is unregistered.
    Closed,
}

/// One observer connection as seen by the notification core.
///
/// Holds only the observer id; the socket stays with the transport.
#[derive(Debug)]
pub struct Session {
    id: ObserverId,
    hub: NotificationHub,
    state: Mutex<ConnectionState>,
}

impl Session {
    /// Registers a new observer whose outbound channel starts with the
    /// `CONNECTED` acknowledgment.
    ///
    /// Returns the session and the outbound receiver the transport must
    /// drain.
    pub async fn open(hub: &NotificationHub) -> (Self, mpsc::Receiver<Frame>) {
        let Registration { id, outbound } = hub.connect().await;
        let session = Self {
            id,
            hub: hub.clone(),
            state: Mutex::new(ConnectionState::Connecting),
        };
        session.transition(ConnectionState::Connecting, ConnectionState::Connected);
        tracing::info!(observer_id = %id, "observer connected");

        (session, outbound)
    }

    /// Returns the observer id.
    #[must_use]
    pub const fn id(&self) -> ObserverId {
        self.id
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handles one inbound text frame.
    ///
    /// Valid frames update the subscription and are returned. Anything else
    /// is logged and ignored; the connection stays open.
    pub async fn handle_text(&self, text: &str) -> Option<ControlFrame> {
        if self.state() != ConnectionState::Connected {
            tracing::debug!(observer_id = %self.id, "ignoring frame on inactive session");
            return None;
        }

        let frame = match ControlFrame::parse(text) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(observer_id = %self.id, %err, "ignoring inbound frame");
                return None;
            }
        };

        match &frame {
            ControlFrame::Subscribe { bin_id } => {
                self.hub.subscribe(bin_id, self.id).await;
                tracing::debug!(observer_id = %self.id, %bin_id, "subscribed");
            }
            ControlFrame::Unsubscribe { bin_id } => {
                self.hub.unsubscribe(bin_id, self.id).await;
                tracing::debug!(observer_id = %self.id, %bin_id, "unsubscribed");
            }
        }
        Some(frame)
    }

    /// Closes the session, unregistering the observer and clearing its
    /// subscriptions.
    ///
    /// Returns `true` for the call that performed the cleanup and `false`
    /// for every later (or concurrent) call.
    pub async fn close(&self) -> bool {
        let previous = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, ConnectionState::Closed)
        };
        if previous == ConnectionState::Closed {
            return false;
        }

        let subscriptions = self.hub.unregister(self.id).await;
        tracing::info!(
            observer_id = %self.id,
            subscriptions = subscriptions.len(),
            "observer disconnected"
        );
        true
    }

    fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == from {
            *state = to;
            true
        } else {
            false
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if *state == ConnectionState::Closed {
            return;
        }
        *state = ConnectionState::Closed;

        let hub = self.hub.clone();
        let id = self.id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let _ = hub.unregister(id).await;
                    tracing::debug!(observer_id = %id, "observer cleaned up after drop");
                });
            }
            Err(_) => {
                tracing::warn!(observer_id = %id, "session dropped outside a runtime");
            }
        }
    }
}
