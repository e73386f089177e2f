use crate::{AppState, handlers, route_table::RouteRegistrar};

/// System Router Module
///
/// Administrative endpoints over the permission registry. Paths are relative to
/// `API_PREFIX`; names are the stable labels copied into catalog records.
pub fn system_routes() -> RouteRegistrar<AppState> {
    RouteRegistrar::new()
        // GET /api/v1/api-interface/page?page=..&page_size=..
        // Paged listing of the permission catalog.
        .get("/api-interface/page", handlers::list_api_interface_page)
        .name("ApiInterfacePage")
        .describe("Paged listing of catalogued API permissions")
        // GET /api/v1/routes
        // Routes discovered from the live route table.
        .get("/routes", handlers::list_routes)
        .name("RouteList")
}
