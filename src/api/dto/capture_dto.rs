//! DTOs for the capture endpoint.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::BinId;

/// Acknowledgment returned to whoever sent a request into a bin.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    /// Always `true`.
    pub success: bool,
    /// Fixed `"Request captured"` message.
    pub message: String,
    /// Bin that captured the request.
    pub bin_id: BinId,
}
