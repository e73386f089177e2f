//! Router Module Index
//!
//! Every endpoint is registered through a `RouteRegistrar`, so assembling the router
//! also yields the `RouteTable` that startup permission discovery reads.

use crate::{AppState, route_table::RouteRegistrar};

/// Routes outside the versioned API (health checks). Anonymous, never catalogued.
pub mod public;

/// Administrative routes mounted under `API_PREFIX`. Every route here is named.
pub mod system;

/// Path prefix of the versioned API. Only routes under it are permission-catalogued.
pub const API_PREFIX: &str = "/api/v1";

/// api_routes
///
/// Assembles every application route along with its registration record.
pub fn api_routes() -> RouteRegistrar<AppState> {
    RouteRegistrar::new()
        .merge(public::public_routes())
        .nest(API_PREFIX, system::system_routes())
}
