use axum::{
    Router,
    handler::Handler,
    routing::{self, MethodRouter},
};

use crate::models::HttpMethod;

/// RouteEntry
///
/// One endpoint as it was registered on the router. An empty `name` marks the route
/// as anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub method: HttpMethod,
    pub path: String,
    pub name: String,
    pub description: Option<String>,
}

impl RouteEntry {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            name: String::new(),
            description: None,
        }
    }

    pub fn named(method: HttpMethod, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(method, path)
        }
    }
}

/// RouteTable
///
/// Snapshot of every endpoint the router was assembled with, in registration order.
/// Axum does not expose its routing table, so the table is recorded by `RouteRegistrar`
/// while the router is built and handed around as a plain value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: RouteEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn last_mut(&mut self) -> Option<&mut RouteEntry> {
        self.entries.last_mut()
    }
}

impl From<Vec<RouteEntry>> for RouteTable {
    fn from(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }
}

/// RouteRegistrar
///
/// Thin wrapper over `axum::Router` that records each registration in a `RouteTable`.
/// Naming works like a builder suffix: `.get("/page", handler).name("RolePage")` names
/// the route registered just before it.
pub struct RouteRegistrar<S = ()> {
    router: Router<S>,
    table: RouteTable,
}

impl<S> Default for RouteRegistrar<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RouteRegistrar<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            table: RouteTable::new(),
        }
    }

    pub fn get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(HttpMethod::Get, path, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(HttpMethod::Post, path, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(HttpMethod::Put, path, routing::put(handler))
    }

    pub fn delete<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(HttpMethod::Delete, path, routing::delete(handler))
    }

    pub fn patch<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(HttpMethod::Patch, path, routing::patch(handler))
    }

    pub fn head<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(HttpMethod::Head, path, routing::head(handler))
    }

    pub fn options<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(HttpMethod::Options, path, routing::options(handler))
    }

    /// Names the most recently registered route. No-op on an empty registrar.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        if let Some(entry) = self.table.last_mut() {
            entry.name = name.into();
        }
        self
    }

    /// Attaches a human-readable description to the most recently registered route.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        if let Some(entry) = self.table.last_mut() {
            entry.description = Some(description.into());
        }
        self
    }

    /// Mounts `child` under `prefix`; recorded paths get the prefix prepended.
    /// A child root (`/`) is served at the bare prefix, so it is recorded as such.
    pub fn nest(mut self, prefix: &str, child: RouteRegistrar<S>) -> Self {
        self.router = self.router.nest(prefix, child.router);
        for mut entry in child.table.entries {
            entry.path = if entry.path == "/" {
                prefix.to_string()
            } else {
                format!("{}{}", prefix, entry.path)
            };
            self.table.push(entry);
        }
        self
    }

    pub fn merge(mut self, other: RouteRegistrar<S>) -> Self {
        self.router = self.router.merge(other.router);
        self.table.entries.extend(other.table.entries);
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn into_parts(self) -> (Router<S>, RouteTable) {
        (self.router, self.table)
    }

    fn register(mut self, method: HttpMethod, path: &str, method_router: MethodRouter<S>) -> Self {
        self.router = self.router.route(path, method_router);
        self.table.push(RouteEntry::new(method, path));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop() -> &'static str {
        "ok"
    }

    #[test]
    fn test_registration_order_and_naming() {
        let registrar = RouteRegistrar::<()>::new()
            .get("/a", noop)
            .name("A")
            .post("/a", noop)
            .get("/b", noop)
            .describe("second");

        let entries = registrar.table().entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], RouteEntry::named(HttpMethod::Get, "/a", "A"));
        assert_eq!(entries[1].method, HttpMethod::Post);
        assert!(entries[1].name.is_empty());
        assert_eq!(entries[2].description.as_deref(), Some("second"));
    }

    #[test]
    fn test_nest_prefixes_recorded_paths() {
        let child = RouteRegistrar::<()>::new().delete("/x/{id}", noop).name("XDelete");
        let (_router, table) = RouteRegistrar::<()>::new()
            .nest("/api/v1", child)
            .into_parts();

        assert_eq!(table.entries()[0].path, "/api/v1/x/{id}");
        assert_eq!(table.entries()[0].name, "XDelete");
    }

    #[test]
    fn test_nest_records_child_root_at_bare_prefix() {
        let child = RouteRegistrar::<()>::new()
            .get("/", noop)
            .name("EssayIndex")
            .get("/page", noop)
            .name("EssayPage");
        let (_router, table) = RouteRegistrar::<()>::new()
            .nest("/api/v1/essay", child)
            .into_parts();

        assert_eq!(table.entries()[0].path, "/api/v1/essay");
        assert_eq!(table.entries()[1].path, "/api/v1/essay/page");
    }

    #[test]
    fn test_name_on_empty_registrar_is_noop() {
        let registrar = RouteRegistrar::<()>::new().name("Nothing");
        assert!(registrar.table().is_empty());
    }
}
