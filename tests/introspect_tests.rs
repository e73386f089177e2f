use admin_portal::{
    RouteEntry, RouteRegistrar, RouteTable,
    introspect::discover,
    models::{HttpMethod, RouteDescriptor},
    route_table,
    routes::API_PREFIX,
};

fn essay_create() -> RouteEntry {
    RouteEntry::named(HttpMethod::Post, "/api/v1/essay/create", "EssayCreate")
}

#[test]
fn test_discover_keeps_named_prefixed_routes_only() {
    let table = RouteTable::from(vec![
        essay_create(),
        RouteEntry::new(HttpMethod::Get, "/healthz"),
    ]);

    let found = discover(&table, API_PREFIX);

    assert_eq!(
        found,
        vec![RouteDescriptor {
            name: "EssayCreate".to_string(),
            path: "/api/v1/essay/create".to_string(),
            method: HttpMethod::Post,
            description: "/api/v1/essay/create".to_string(),
        }]
    );
}

#[test]
fn test_discover_excludes_unnamed_routes() {
    let table = RouteTable::from(vec![RouteEntry::new(HttpMethod::Get, "/api/v1/essay/page")]);
    assert!(discover(&table, API_PREFIX).is_empty());
}

async fn noop() -> &'static str {
    "ok"
}

#[test]
fn test_discover_excludes_uncatalogued_methods() {
    let essay = RouteRegistrar::<()>::new()
        .head("/page", noop)
        .name("EssayHead")
        .options("/page", noop)
        .name("EssayOptions")
        .patch("/update/{id}", noop)
        .name("EssayPatch");
    let (_router, table) = RouteRegistrar::<()>::new()
        .nest("/api/v1/essay", essay)
        .into_parts();

    let methods: Vec<HttpMethod> = table.entries().iter().map(|e| e.method).collect();
    assert_eq!(
        methods,
        vec![HttpMethod::Head, HttpMethod::Options, HttpMethod::Patch]
    );
    assert!(discover(&table, API_PREFIX).is_empty());
}

#[test]
fn test_discover_excludes_paths_outside_prefix() {
    let table = RouteTable::from(vec![
        RouteEntry::named(HttpMethod::Get, "/api/auth/login/password", "Login"),
        RouteEntry::named(HttpMethod::Get, "/static/app.js", "Asset"),
    ]);
    assert!(discover(&table, API_PREFIX).is_empty());
}

#[test]
fn test_discover_keeps_all_catalogued_methods_in_order() {
    let table = RouteTable::from(vec![
        RouteEntry::named(HttpMethod::Delete, "/api/v1/wallet/delete/{id}", "WalletDelete"),
        RouteEntry::named(HttpMethod::Get, "/api/v1/wallet/page", "WalletPage"),
        RouteEntry::named(HttpMethod::Put, "/api/v1/wallet/update/{id}", "WalletUpdate"),
        RouteEntry::named(HttpMethod::Post, "/api/v1/wallet/create", "WalletCreate"),
    ]);

    let names: Vec<String> = discover(&table, API_PREFIX)
        .into_iter()
        .map(|d| d.name)
        .collect();

    assert_eq!(
        names,
        vec!["WalletDelete", "WalletPage", "WalletUpdate", "WalletCreate"]
    );
}

#[test]
fn test_live_route_table_is_discoverable() {
    let table = route_table();

    // The anonymous health probe is registered but never discovered.
    assert!(
        table
            .entries()
            .iter()
            .any(|e| e.path == "/health" && e.name.is_empty())
    );

    let found = discover(&table, API_PREFIX);
    assert!(found.iter().any(|d| d.name == "ApiInterfacePage"
        && d.path == "/api/v1/api-interface/page"
        && d.method == HttpMethod::Get));
    assert!(found.iter().any(|d| d.name == "RouteList" && d.path == "/api/v1/routes"));
    assert!(found.iter().all(|d| d.path.starts_with(API_PREFIX)));
}
