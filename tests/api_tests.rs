use admin_portal::{
    AppConfig, AppState, InMemoryCatalog, create_router, route_table, routes::API_PREFIX,
    sync::sync_routes,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

// Boots the service the way main does, with the in-memory catalog in place of Postgres.
async fn spawn_app() -> TestApp {
    let catalog = Arc::new(InMemoryCatalog::new());
    let routes = route_table();
    sync_routes(catalog.clone(), &routes, API_PREFIX).await;

    let state = AppState {
        catalog,
        config: AppConfig::default(),
        routes: Arc::new(routes),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .get(&format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_api_interface_page_lists_synced_routes() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!(
            "{}/api/v1/api-interface/page?page=1&page_size=10",
            app.address
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 200);

    let expected = route_table()
        .entries()
        .iter()
        .filter(|e| e.path.starts_with(API_PREFIX) && !e.name.is_empty())
        .count();
    assert_eq!(body["data"]["total"], expected as i64);

    let records = body["data"]["records"].as_array().unwrap();
    assert!(records.iter().any(|r| r["name"] == "ApiInterfacePage"
        && r["method"] == "GET"
        && r["permission_type"] == "public"
        && r["roles"][0] == "default"
        && r["status"] == "active"));
}

#[tokio::test]
async fn test_api_interface_page_defaults_paging() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/v1/api-interface/page", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_api_interface_page_rejects_non_numeric_page() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!(
            "{}/api/v1/api-interface/page?page=abc&page_size=10",
            app.address
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 400);
    assert!(body["data"].is_null());
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_routes_endpoint_lists_discovered_routes() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/v1/routes", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let routes = body["data"].as_array().unwrap();
    assert!(routes.iter().any(|r| r["name"] == "RouteList"));
}
