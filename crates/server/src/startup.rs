use std::{future::Future, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig, StoreConfig};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::store::{InMemoryStore, KeyValueStore};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Create the process-wide store, pre-populated from `[store.seed]`.
pub fn build_store(cfg: &StoreConfig) -> Arc<dyn KeyValueStore> {
    let store = InMemoryStore::with_entries(cfg.seed.clone());
    info!(seeded = cfg.seed.len(), "store initialized");
    Arc::new(store)
}

/// Router wired to the given store, with tracing and CORS layers.
pub fn build_app(store: Arc<dyn KeyValueStore>) -> Router {
    routes::build_router(ServerState::new(store), build_cors())
}

/// Bind the configured `host:port`; port `0` picks a free one.
pub async fn bind(cfg: &ServerConfig) -> Result<TcpListener, StartupError> {
    let addr = cfg.bind_addr();
    TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

/// Serve a seeded store on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, cfg: &AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = build_store(&cfg.store);
    let app = build_app(store);

    let addr = listener.local_addr()?;
    info!(%addr, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("http server drained");
    Ok(())
}

/// Bind, build the app and serve it until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind(&cfg.server).await?;
    serve(listener, &cfg, shutdown).await
}
