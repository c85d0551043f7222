use axum::{Router, routing::get};
use query::DatasetStore;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// The store is read-only after startup, so requests share it without locks.
pub struct AppState {
    pub store: DatasetStore,
}

impl AppState {
    pub fn new(store: DatasetStore) -> Self {
        Self { store }
    }
}

/// Builds the dashboard API. With `static_dir`, every non-API path falls
/// back to the built front end.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([axum::http::Method::GET])
        .allow_headers(AllowHeaders::any());

    let mut app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/filters", get(handlers::get_filters))
        .route("/api/datasets", get(handlers::get_datasets))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/trades", get(handlers::get_trades))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(
    addr: SocketAddr,
    store: DatasetStore,
    static_dir: Option<&Path>,
) -> anyhow::Result<()> {
    tracing::info!(datasets = store.len(), "Serving loaded datasets.");
    if store.is_empty() {
        tracing::warn!("No datasets loaded; every dashboard query will return no data.");
    }

    let app = router(Arc::new(AppState::new(store)), static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
