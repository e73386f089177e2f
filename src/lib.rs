use axum::{Router, extract::FromRef, http::HeaderName};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod catalog;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod introspect;
pub mod models;
pub mod route_table;
pub mod sync;

pub mod routes;

// --- Public Re-exports ---

pub use catalog::{CatalogState, InMemoryCatalog, PermissionCatalog, PostgresCatalog};
pub use config::AppConfig;
pub use route_table::{RouteEntry, RouteRegistrar, RouteTable};
pub use sync::{PermissionSynchronizer, SyncOutcome, SyncReport};

/// ApiDoc
///
/// OpenAPI document for the administrative API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::list_api_interface_page, handlers::list_routes),
    components(
        schemas(
            models::PermissionRecord, models::PermissionType, models::PermissionStatus,
            models::HttpMethod, models::RouteDescriptor,
        )
    ),
    tags(
        (name = "admin-portal", description = "Back-office administration API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cheaply clonable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Permission catalog (Postgres in production, in-memory in tests).
    pub catalog: CatalogState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
    /// Registration record of the live router, captured at startup.
    pub routes: Arc<RouteTable>,
}

// Lets handlers that only touch the catalog extract `State<CatalogState>` directly.
impl FromRef<AppState> for CatalogState {
    fn from_ref(app_state: &AppState) -> CatalogState {
        app_state.catalog.clone()
    }
}

/// route_table
///
/// The registration record of every application route, in registration order.
/// Built from the same assembly `create_router` uses, so the two never disagree.
pub fn route_table() -> RouteTable {
    let (_, table) = routes::api_routes().into_parts();
    table
}

/// create_router
///
/// Assembles the routing structure, applies the observability layers and registers
/// the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let (mut router, _) = routes::api_routes().into_parts();

    // Mounted outside the registrar, so documentation never enters the route table.
    if state.config.swagger_enabled {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span, tagging it with the `x-request-id` set upstream so every
/// log line of one request correlates.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
