//! Domain events pushed to WebSocket observers.
//!
//! Every externally visible state change emits a [`BinEvent`] through the
//! [`crate::notify::NotificationHub`]. Events carry value snapshots of the
//! affected bin and request, never live references.

use serde::{Deserialize, Serialize};

use super::{Bin, BinId, CapturedRequest, ObserverId};

/// Event delivered to observers as a JSON text frame.
///
/// Serialized with a `type` discriminator, e.g.
/// `{"type":"BIN_DELETED","binId":"a1b2c3d4e5"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinEvent {
    /// A bin was created.
    BinCreated {
        /// Snapshot of the new bin.
        bin: Bin,
    },

    /// A bin was replaced with a new value (e.g. renamed).
    BinUpdated {
        /// Snapshot after the update.
        bin: Bin,
    },

    /// A bin was deleted.
    BinDeleted {
        /// Identifier of the deleted bin.
        #[serde(rename = "binId")]
        bin_id: BinId,
    },

    /// A request was captured by a bin.
    RequestReceived {
        /// Snapshot of the bin including the new request.
        bin: Bin,
        /// The captured request.
        request: CapturedRequest,
    },

    /// Acknowledgment sent to a freshly connected observer.
    Connected {
        /// Identifier assigned to the observer.
        #[serde(rename = "clientId")]
        client_id: ObserverId,
    },
}

impl BinEvent {
    /// Returns the bin this event is about, if any.
    #[must_use]
    pub fn bin_id(&self) -> Option<&BinId> {
        match self {
            Self::BinCreated { bin } | Self::BinUpdated { bin } | Self::RequestReceived { bin, .. } => {
                Some(&bin.id)
            }
            Self::BinDeleted { bin_id } => Some(bin_id),
            Self::Connected { .. } => None,
        }
    }

    /// Returns the wire `type` tag as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::BinCreated { .. } => "BIN_CREATED",
            Self::BinUpdated { .. } => "BIN_UPDATED",
            Self::BinDeleted { .. } => "BIN_DELETED",
            Self::RequestReceived { .. } => "REQUEST_RECEIVED",
            Self::Connected { .. } => "CONNECTED",
        }
    }
}
