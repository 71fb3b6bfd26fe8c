//! HTTP requests captured by a bin.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single HTTP request captured by a bin.
///
/// Immutable once constructed; the id and timestamp are assigned at capture
/// time by [`CapturedRequest::capture`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRequest {
    /// Unique request identifier.
    pub id: uuid::Uuid,
    /// Capture timestamp.
    pub timestamp: DateTime<Utc>,
    /// HTTP method (e.g. `"POST"`).
    pub method: String,
    /// Full request URL as seen by the server.
    pub url: String,
    /// Request path.
    pub path: String,
    /// Decoded query parameters.
    pub query: BTreeMap<String, String>,
    /// Request headers, lowercase names.
    pub headers: BTreeMap<String, String>,
    /// Request body, `None` for methods without one.
    pub body: Option<String>,
    /// Source address of the caller, `"unknown"` when not derivable.
    pub ip: String,
    /// Value of the `content-type` header, if any.
    pub content_type: Option<String>,
}

/// Request data as parsed by the HTTP layer, before capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRequest {
    /// HTTP method.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// Request path.
    pub path: String,
    /// Decoded query parameters.
    pub query: BTreeMap<String, String>,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: Option<String>,
    /// Source address.
    pub ip: String,
    /// Content type.
    pub content_type: Option<String>,
}

impl CapturedRequest {
    /// Stamps `data` with a fresh id and the current time.
    #[must_use]
    pub fn capture(data: NewRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            timestamp: Utc::now(),
            method: data.method,
            url: data.url,
            path: data.path,
            query: data.query,
            headers: data.headers,
            body: data.body,
            ip: data.ip,
            content_type: data.content_type,
        }
    }
}
