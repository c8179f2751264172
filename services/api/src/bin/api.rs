//! services/api/src/bin/api.rs

use doubtnlearn_api::{
    adapters::{
        Argon2Hasher, DbAdapter, DiskUploadStore, HtmlDashboardRenderer, InMemoryDb,
        InMemorySessionStore,
    },
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use doubtnlearn_core::ports::{DatabaseService, SessionStore};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to the Document Store ---
    let db: Arc<dyn DatabaseService> = if config.uses_memory_store() {
        info!("Using the in-memory store; records are lost on restart.");
        Arc::new(InMemoryDb::new())
    } else {
        info!("Connecting to database...");
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(&config.database_url)?;
        let db_adapter = DbAdapter::new(db_pool);
        info!("Running database migrations...");
        // An unreachable database must not stop the server; requests fail with 500 until it is back.
        match db_adapter.run_migrations().await {
            Ok(()) => info!("Database migrations complete."),
            Err(e) => error!("Database connection error: {}", e),
        }
        Arc::new(db_adapter)
    };

    // --- 3. Initialize Service Adapters ---
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let uploads = Arc::new(DiskUploadStore::new(config.upload_dir.clone()));

    let renderer = Arc::new(HtmlDashboardRenderer::from_views_dir(&config.views_dir).await?);

    let sessions = Arc::new(InMemorySessionStore::new(chrono::Duration::seconds(
        config.session_ttl_secs,
    )));
    spawn_session_purge(sessions.clone());

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db,
        sessions,
        hasher: Arc::new(Argon2Hasher::new()),
        uploads,
        renderer,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    // Merge the app router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(build_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops expired login sessions.
fn spawn_session_purge(sessions: Arc<InMemorySessionStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => info!("Purged {} expired sessions", removed),
                Err(e) => error!("Failed to purge expired sessions: {:?}", e),
            }
        }
    });
}
