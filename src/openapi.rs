//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    BinListResponse, BinResponse, CaptureResponse, CreateBinRequest, DeleteBinResponse,
    RenameBinRequest, RequestResponse,
};
use crate::api::handlers::{bins, capture, system};
use crate::domain::{Bin, BinId, CapturedRequest};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI specification of all REST endpoints.
///
/// The WebSocket endpoint `/ws` is not part of the document.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "request-bin",
        description = "Create bins that capture any HTTP request sent to them and watch captures live over /ws."
    ),
    paths(
        bins::list_bins,
        bins::create_bin,
        bins::get_bin,
        bins::rename_bin,
        bins::delete_bin,
        bins::get_request,
        capture::capture,
        system::health_handler,
    ),
    components(schemas(
        Bin,
        BinId,
        CapturedRequest,
        CreateBinRequest,
        RenameBinRequest,
        BinResponse,
        BinListResponse,
        DeleteBinResponse,
        RequestResponse,
        CaptureResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Bins", description = "Bin management"),
        (name = "Capture", description = "Request capture endpoints"),
        (name = "System", description = "Health and metadata"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_bin_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/bins"));
        assert!(doc.paths.paths.contains_key("/api/bins/{id}"));
        assert!(doc.paths.paths.contains_key("/b/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn capture_route_documents_a_raw_body() {
        let doc = ApiDoc::openapi();
        let capture = doc
            .paths
            .paths
            .get("/b/{id}")
            .and_then(|item| item.post.as_ref())
            .and_then(|op| op.request_body.as_ref());
        assert!(capture.is_some_and(|body| body.content.contains_key("text/plain")));
    }
}
