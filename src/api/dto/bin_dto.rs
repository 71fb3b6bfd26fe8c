//! Bin-related DTOs for create, get, list, rename, and delete operations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Bin, CapturedRequest};

/// Request body for `POST /api/bins`. The body itself is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateBinRequest {
    /// Optional human-readable name; defaults to `"New Bin"`.
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for `PATCH /api/bins/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameBinRequest {
    /// New bin name.
    pub name: String,
}

/// Single bin wrapper.
#[derive(Debug, Serialize, ToSchema)]
pub struct BinResponse {
    /// Bin snapshot.
    pub bin: Bin,
}

/// Response body for `GET /api/bins`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BinListResponse {
    /// All bins in creation order.
    pub bins: Vec<Bin>,
}

/// Response body for `DELETE /api/bins/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteBinResponse {
    /// Always `true`; failures use the error body.
    pub success: bool,
}

/// Single captured request wrapper.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestResponse {
    /// Captured request.
    pub request: CapturedRequest,
}
