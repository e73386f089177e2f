use admin_portal::{
    AppState,
    catalog::{CatalogState, PostgresCatalog},
    config::{AppConfig, Env},
    create_router, route_table,
    routes::API_PREFIX,
    sync::sync_routes,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Startup order: configuration, logging, database, route permission sync, HTTP server.
/// The sync pass finishes before the listener is bound and can never abort startup.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "admin_portal=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Failed to run database migrations.");

    let catalog = Arc::new(PostgresCatalog::new(pool)) as CatalogState;

    // Reconcile the live route table with the permission catalog.
    let routes = route_table();
    tracing::debug!(registered = routes.len(), "route table recorded");
    sync_routes(catalog.clone(), &routes, API_PREFIX).await;

    let server_addr = config.server_addr.clone();
    let swagger_enabled = config.swagger_enabled;
    let app_state = AppState {
        catalog,
        config,
        routes: Arc::new(routes),
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(&server_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check SERVER_ADDR.");

    tracing::info!("Listening on {}", server_addr);
    if swagger_enabled {
        tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");
    }

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
