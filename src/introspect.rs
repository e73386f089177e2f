use crate::models::RouteDescriptor;
use crate::route_table::RouteTable;

/// discover
///
/// Derives the endpoints that need a permission record from a route table snapshot.
/// An entry is kept only when its path sits under `prefix`, it was given a name, and
/// its method is one of GET, POST, PUT or DELETE. Health checks, unnamed routes and
/// HEAD/OPTIONS handlers fall out here. Registration order is preserved.
pub fn discover(table: &RouteTable, prefix: &str) -> Vec<RouteDescriptor> {
    table
        .entries()
        .iter()
        .filter(|entry| {
            entry.path.starts_with(prefix) && !entry.name.is_empty() && entry.method.is_catalogued()
        })
        .map(|entry| RouteDescriptor {
            name: entry.name.clone(),
            path: entry.path.clone(),
            method: entry.method,
            description: entry
                .description
                .clone()
                .unwrap_or_else(|| entry.path.clone()),
        })
        .collect()
}
