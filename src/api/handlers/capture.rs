//! Request capture: any method on `/b/{id}/...` is recorded into the bin.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, Uri, header};
use axum::response::IntoResponse;
use axum::routing::any;
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::dto::CaptureResponse;
use crate::app_state::AppState;
use crate::domain::{BinId, NewRequest};
use crate::error::{AppError, ErrorResponse};

/// Path parameters of the capture routes. The trailing wildcard, when
/// present, is ignored; the full path is taken from the URI.
#[derive(Debug, Deserialize)]
pub struct CapturePath {
    /// Bin id.
    pub id: String,
}

/// `ANY /b/{id}/{*path}` — Capture a request into a bin.
///
/// # Errors
///
/// Returns [`AppError::BinNotFound`] if the bin does not exist.
#[utoipa::path(
    post,
    path = "/b/{id}",
    tag = "Capture",
    summary = "Capture a request",
    description = "Records method, URL, headers, query and body of any request sent to /b/{id} or below, then sends REQUEST_RECEIVED to the bin's subscribers. Every HTTP method is accepted.",
    params(
        ("id" = String, Path, description = "Bin id"),
    ),
    request_body(content = String, description = "Any payload; recorded verbatim"),
    responses(
        (status = 200, description = "Request captured", body = CaptureResponse),
        (status = 404, description = "Bin not found", body = ErrorResponse),
    )
)]
pub async fn capture(
    State(state): State<AppState>,
    Path(CapturePath { id }): Path<CapturePath>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let bin_id = BinId::from(id);
    let data = parse_request(&method, &uri, &headers, &body);
    state.bin_service.capture_request(&bin_id, data).await?;

    Ok(Json(CaptureResponse {
        success: true,
        message: "Request captured".to_string(),
        bin_id,
    }))
}

/// Turns the raw HTTP parts into a [`NewRequest`].
fn parse_request(method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> NewRequest {
    let query = Query::<BTreeMap<String, String>>::try_from_uri(uri)
        .map(|Query(query)| query)
        .unwrap_or_default();

    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        match header_map.entry(name.as_str().to_string()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value.into_owned());
            }
        }
    }

    let body = if method == Method::GET || method == Method::HEAD {
        None
    } else {
        Some(String::from_utf8_lossy(body).into_owned())
    };

    NewRequest {
        method: method.as_str().to_string(),
        url: full_url(uri, headers),
        path: uri.path().to_string(),
        query,
        headers: header_map,
        body,
        ip: client_ip(headers),
        content_type: header_str(headers, header::CONTENT_TYPE.as_str()).map(str::to_string),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn full_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.scheme().is_some() {
        return uri.to_string();
    }
    match header_str(headers, header::HOST.as_str()) {
        Some(host) => format!("http://{host}{uri}"),
        None => uri.to_string(),
    }
}

fn client_ip(headers: &HeaderMap) -> String {
    header_str(headers, "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .or_else(|| header_str(headers, "x-real-ip"))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Capture routes. Mounted at the root, outside `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/b/{id}", any(capture))
        .route("/b/{id}/", any(capture))
        .route("/b/{id}/{*path}", any(capture))
}
