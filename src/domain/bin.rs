//! Capture bins: a named, append-only list of captured requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BinId, CapturedRequest};

/// A capture bin.
///
/// Bins are values: "updating" a bin builds a new `Bin` (see
/// [`Bin::with_request`], [`Bin::renamed`]) and replaces the stored one, so a
/// snapshot handed to an event never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    /// Bin identifier.
    pub id: BinId,
    /// Human-readable name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Captured requests in arrival order.
    pub requests: Vec<CapturedRequest>,
}

impl Bin {
    /// Creates an empty bin with a freshly generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(BinId::generate(), name)
    }

    /// Creates an empty bin with the given id.
    #[must_use]
    pub fn with_id(id: BinId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
            requests: Vec::new(),
        }
    }

    /// Returns a copy of this bin with `request` appended.
    #[must_use]
    pub fn with_request(&self, request: CapturedRequest) -> Self {
        let mut next = self.clone();
        next.requests.push(request);
        next
    }

    /// Returns a copy of this bin carrying a new name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Looks up a captured request by id.
    #[must_use]
    pub fn request(&self, request_id: uuid::Uuid) -> Option<&CapturedRequest> {
        self.requests.iter().find(|r| r.id == request_id)
    }
}
