use crate::{AppState, route_table::RouteRegistrar};

/// Public Router Module
///
/// Unauthenticated infrastructure endpoints. They are deliberately left unnamed and
/// sit outside the API prefix, so discovery never adds them to the permission catalog.
pub fn public_routes() -> RouteRegistrar<AppState> {
    RouteRegistrar::new()
        // GET /health
        // Liveness probe for load balancers.
        .get("/health", || async { "ok" })
}
