use crate::{
    AppState,
    catalog::CatalogState,
    errors::{AppError, AppResult},
    introspect::discover,
    models::{ApiResponse, PageQuery, PageResult, PermissionRecord, RouteDescriptor},
    routes::API_PREFIX,
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

/// list_api_interface_page
///
/// [Admin Route] Pages through the permission catalog that startup discovery fills.
///
/// Non-numeric or out-of-range `page`/`page_size` values are answered with a 400
/// envelope; catalog failures with a 500 envelope.
#[utoipa::path(
    get,
    path = "/api/v1/api-interface/page",
    params(PageQuery),
    responses(
        (status = 200, description = "Catalog page", body = ApiResponse<PageResult<PermissionRecord>>),
        (status = 400, description = "Malformed paging parameters"),
        (status = 500, description = "Catalog unavailable")
    )
)]
pub async fn list_api_interface_page(
    State(catalog): State<CatalogState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<PageResult<PermissionRecord>>>> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let (offset, limit) = query.to_offset_limit().map_err(AppError::bad_request)?;

    let page = catalog.page(offset, limit).await?;

    Ok(Json(ApiResponse::success("route permissions retrieved", page)))
}

/// list_routes
///
/// [Admin Route] Lists the endpoints that discovery derives from the live route table,
/// i.e. the set the permission catalog is reconciled against.
#[utoipa::path(
    get,
    path = "/api/v1/routes",
    responses((status = 200, description = "Discovered routes as an envelope whose data is a RouteDescriptor array"))
)]
pub async fn list_routes(State(state): State<AppState>) -> Json<ApiResponse<Vec<RouteDescriptor>>> {
    let descriptors = discover(&state.routes, API_PREFIX);
    Json(ApiResponse::success("routes retrieved", descriptors))
}
