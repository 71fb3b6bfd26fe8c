//! Type-safe observer identifier.
//!
//! [`ObserverId`] is a newtype wrapper around [`uuid::Uuid`] (v4) so that
//! observer ids cannot be confused with request ids or other UUIDs.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for one connected WebSocket observer.
///
/// Assigned at connect time and never reused. Sent to the client in the
/// `CONNECTED` acknowledgment as `clientId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ObserverId(uuid::Uuid);

impl ObserverId {
    /// Creates a new random `ObserverId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ObserverId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
