//! Bin CRUD handlers: create, list, get, rename, delete, request lookup.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    BinListResponse, BinResponse, CreateBinRequest, DeleteBinResponse, RenameBinRequest,
    RequestResponse,
};
use crate::app_state::AppState;
use crate::domain::BinId;
use crate::error::{AppError, ErrorResponse};

/// `GET /api/bins` — List all bins.
#[utoipa::path(
    get,
    path = "/api/bins",
    tag = "Bins",
    summary = "List bins",
    description = "Returns every bin with its captured requests, in creation order.",
    responses(
        (status = 200, description = "All bins", body = BinListResponse),
    )
)]
pub async fn list_bins(State(state): State<AppState>) -> impl IntoResponse {
    Json(BinListResponse {
        bins: state.bin_service.list_bins().await,
    })
}

/// `POST /api/bins` — Create a bin.
///
/// The JSON body is optional; an absent or unparsable body creates a bin
/// with the default name.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] if the name is too long.
#[utoipa::path(
    post,
    path = "/api/bins",
    tag = "Bins",
    summary = "Create a bin",
    description = "Creates an empty bin and announces it to every connected observer with a BIN_CREATED event.",
    request_body = CreateBinRequest,
    responses(
        (status = 201, description = "Bin created", body = BinResponse),
        (status = 400, description = "Invalid name", body = ErrorResponse),
    )
)]
pub async fn create_bin(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let req: CreateBinRequest = serde_json::from_slice(&body).unwrap_or_default();
    let bin = state.bin_service.create_bin(req.name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(BinResponse { bin })))
}

/// `GET /api/bins/{id}` — Get one bin.
///
/// # Errors
///
/// Returns [`AppError::BinNotFound`] if the bin does not exist.
#[utoipa::path(
    get,
    path = "/api/bins/{id}",
    tag = "Bins",
    summary = "Get a bin",
    params(
        ("id" = String, Path, description = "Bin id"),
    ),
    responses(
        (status = 200, description = "Bin with its requests", body = BinResponse),
        (status = 404, description = "Bin not found", body = ErrorResponse),
    )
)]
pub async fn get_bin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bin = state.bin_service.get_bin(&BinId::from(id)).await?;
    Ok(Json(BinResponse { bin }))
}

/// `PATCH /api/bins/{id}` — Rename a bin.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] for a malformed body or invalid
/// name and [`AppError::BinNotFound`] if the bin does not exist.
#[utoipa::path(
    patch,
    path = "/api/bins/{id}",
    tag = "Bins",
    summary = "Rename a bin",
    description = "Replaces the bin's name and sends BIN_UPDATED to the bin's subscribers.",
    params(
        ("id" = String, Path, description = "Bin id"),
    ),
    request_body = RenameBinRequest,
    responses(
        (status = 200, description = "Renamed bin", body = BinResponse),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "Bin not found", body = ErrorResponse),
    )
)]
pub async fn rename_bin(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RenameBinRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let bin = state
        .bin_service
        .rename_bin(&BinId::from(id), &req.name)
        .await?;
    Ok(Json(BinResponse { bin }))
}

/// `DELETE /api/bins/{id}` — Delete a bin.
///
/// # Errors
///
/// Returns [`AppError::BinNotFound`] if the bin does not exist.
#[utoipa::path(
    delete,
    path = "/api/bins/{id}",
    tag = "Bins",
    summary = "Delete a bin",
    description = "Deletes the bin and broadcasts BIN_DELETED to every connected observer.",
    params(
        ("id" = String, Path, description = "Bin id"),
    ),
    responses(
        (status = 200, description = "Bin deleted", body = DeleteBinResponse),
        (status = 404, description = "Bin not found", body = ErrorResponse),
    )
)]
pub async fn delete_bin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.bin_service.delete_bin(&BinId::from(id)).await?;
    Ok(Json(DeleteBinResponse { success: true }))
}

/// `GET /api/bins/{id}/requests/{request_id}` — Get one captured request.
///
/// # Errors
///
/// Returns [`AppError::BinNotFound`] or [`AppError::RequestNotFound`].
#[utoipa::path(
    get,
    path = "/api/bins/{id}/requests/{request_id}",
    tag = "Bins",
    summary = "Get a captured request",
    params(
        ("id" = String, Path, description = "Bin id"),
        ("request_id" = uuid::Uuid, Path, description = "Request UUID"),
    ),
    responses(
        (status = 200, description = "Captured request", body = RequestResponse),
        (status = 404, description = "Bin or request not found", body = ErrorResponse),
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path((id, request_id)): Path<(String, uuid::Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let request = state
        .bin_service
        .get_request(&BinId::from(id), request_id)
        .await?;
    Ok(Json(RequestResponse { request }))
}

/// Bin management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bins", get(list_bins).post(create_bin))
        .route(
            "/bins/{id}",
            get(get_bin).patch(rename_bin).delete(delete_bin),
        )
        .route("/bins/{id}/requests/{request_id}", get(get_request))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ServerConfig;
    use crate::domain::BinStore;
    use crate::notify::NotificationHub;
    use crate::service::BinService;

    fn app() -> (Router, AppState) {
        let hub = NotificationHub::new(16);
        let service = BinService::new(
            Arc::new(BinStore::new()),
            hub.clone(),
            &ServerConfig::default(),
        );
        let state = AppState {
            bin_service: Arc::new(service),
            hub,
        };
        (routes().with_state(state.clone()), state)
    }

    async fn send(router: Router, method: Method, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let Ok(request) = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("invalid request");
        };
        let Ok(response) = router.oneshot(request).await else {
            panic!("router failed");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn create_then_get() {
        let (router, _) = app();
        let (status, created) = send(router.clone(), Method::POST, "/bins", r#"{"name":"hooks"}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["bin"]["name"], "hooks");

        let id = created["bin"]["id"].as_str().unwrap_or_default().to_string();
        let (status, fetched) = send(router, Method::GET, &format!("/bins/{id}"), "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["bin"]["id"], id);
    }

    #[tokio::test]
    async fn create_tolerates_missing_body() {
        let (router, _) = app();
        let (status, created) = send(router, Method::POST, "/bins", "").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["bin"]["name"], "New Bin");
    }

    #[tokio::test]
    async fn unknown_bin_is_404_with_error_body() {
        let (router, _) = app();
        let (status, body) = send(router, Method::GET, "/bins/nope", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 2001);
    }

    #[tokio::test]
    async fn rename_and_delete() {
        let (router, state) = app();
        let Ok(bin) = state.bin_service.create_bin(Some("old")).await else {
            panic!("create failed");
        };

        let uri = format!("/bins/{}", bin.id);
        let (status, renamed) = send(router.clone(), Method::PATCH, &uri, r#"{"name":"new"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["bin"]["name"], "new");

        let (status, _) = send(router.clone(), Method::PATCH, &uri, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, deleted) = send(router.clone(), Method::DELETE, &uri, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["success"], true);

        let (status, _) = send(router, Method::DELETE, &uri, "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_bins_wrapper() {
        let (router, state) = app();
        let _ = state.bin_service.create_bin(None).await;
        let _ = state.bin_service.create_bin(None).await;

        let (status, body) = send(router, Method::GET, "/bins", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bins"].as_array().map(Vec::len), Some(2));
    }
}
