//! Router assembly shared by the binary and the integration tests.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::ServerConfig;
use crate::ws::handler::ws_handler;

/// Builds the full application router: REST API, capture routes, `/ws`,
/// API docs, and the tracing / timeout / CORS middleware stack.
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    with_middleware(with_api_docs(router).with_state(state), config)
}

/// Tracing, request timeout (408), and permissive CORS.
fn with_middleware(router: Router, config: &ServerConfig) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.request_timeout,
            ))
            .layer(CorsLayer::permissive()),
    )
}

#[cfg(feature = "swagger-ui")]
fn with_api_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;

    router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
    )
}

#[cfg(not(feature = "swagger-ui"))]
fn with_api_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;

    router.route(
        "/api-docs/openapi.json",
        get(|| async { axum::Json(crate::openapi::ApiDoc::openapi()) }),
    )
}
