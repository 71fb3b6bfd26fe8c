//! URL-friendly bin identifier.
//!
//! [`BinId`] is a newtype over a short string so bin identifiers cannot be
//! confused with request or observer ids. Freshly generated ids are
//! [`BinId::LEN`] lowercase hex characters; ids received from clients are
//! taken verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a capture bin.
///
/// Used as the key in [`super::BinStore`], as the capture path segment
/// (`/b/{id}/...`) and as the WebSocket subscription target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BinId(String);

impl BinId {
    /// Length of generated ids.
    pub const LEN: usize = 10;

    /// Generates a new random id.
    #[must_use]
    pub fn generate() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Self(raw.chars().take(Self::LEN).collect())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty id, which never names a bin.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BinId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for BinId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
