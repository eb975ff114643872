//! Chengyu Backend
//!
//! Local single-user service for the idiom study tool: reference catalog, side-by-side
//! comparison, and a personal collection persisted in SQLite.

mod api;
mod catalog;
mod collection;
mod comparison;
mod config;
mod db;
mod errors;
mod import;
mod models;
mod notify;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::Catalog;
use collection::CollectionStore;
use config::Config;
use db::SqliteSlots;
use notify::LogNotifier;

/// Application state shared across all handlers.
///
/// The collection mutex is the single mutator context: every write runs to
/// completion before the next one starts.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub collection: Arc<Mutex<CollectionStore>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Chengyu Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Load the reference catalog
    let catalog = Arc::new(Catalog::load(config.catalog_dir.as_deref())?);

    // Initialize storage and restore the collection
    let pool = db::init_database(&config.db_path).await?;
    let storage = Arc::new(SqliteSlots::new(pool.clone()));
    let collection = CollectionStore::load(storage, Arc::new(LogNotifier)).await;
    let collection = Arc::new(Mutex::new(collection));

    let state = AppState {
        catalog,
        collection: collection.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Retry a snapshot write that failed during the session
    let mut collection = collection.lock().await;
    if collection.is_dirty() {
        tracing::warn!("Collection has unsaved changes, retrying write");
    }
    if let Err(e) = collection.flush().await {
        tracing::error!("Unsaved collection changes lost on shutdown: {}", e);
    }
    drop(collection);
    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Catalog
        .route("/idioms", get(api::search_idioms))
        .route("/idioms/{id}", get(api::get_idiom))
        .route("/discriminations", get(api::list_discriminations))
        // Collection
        .route(
            "/collection",
            get(api::list_collection).post(api::add_entry),
        )
        .route("/collection/stats", get(api::collection_stats))
        .route(
            "/collection/{id}",
            get(api::get_entry)
                .put(api::update_entry)
                .delete(api::remove_entry),
        )
        // Import
        .route("/import/preview", post(api::preview_import))
        .route("/import/commit", post(api::commit_import))
        // Comparison
        .route("/comparison", get(api::compare_idioms))
        .route("/comparison/selection", post(api::edit_selection));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
