//! Inbound control frames sent by observers.

use serde::{Deserialize, Serialize};

use crate::domain::BinId;

/// Control message received from an observer.
///
/// Wire format: `{"type":"SUBSCRIBE","binId":"..."}` or
/// `{"type":"UNSUBSCRIBE","binId":"..."}`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlFrame {
    /// Start receiving bin-scoped events for a bin.
    Subscribe {
        /// Target bin.
        #[serde(rename = "binId")]
        bin_id: BinId,
    },
    /// Stop receiving bin-scoped events for a bin.
    Unsubscribe {
        /// Target bin.
        #[serde(rename = "binId")]
        bin_id: BinId,
    },
}

/// Reasons an inbound frame is rejected.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Not JSON, unknown `type`, or missing fields.
    #[error("malformed control frame: {0}")]
    Malformed(#[from] serde_json::Error),
    /// `binId` was present but empty.
    #[error("control frame has an empty binId")]
    EmptyBinId,
}

impl ControlFrame {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] if the text is not a known control frame or
    /// names an empty bin id.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let frame: Self = serde_json::from_str(text)?;
        if frame.bin_id().is_empty() {
            return Err(FrameError::EmptyBinId);
        }
        Ok(frame)
    }

    /// Returns the bin the frame refers to.
    #[must_use]
    pub fn bin_id(&self) -> &BinId {
        match self {
            Self::Subscribe { bin_id } | Self::Unsubscribe { bin_id } => bin_id,
        }
    }
}
