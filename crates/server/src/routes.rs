use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::store::KeyValueStore;

pub mod kv;

/// Shared handler state: the one store instance of the process.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn KeyValueStore>,
}

impl ServerState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

pub const HEALTH_PATH: &str = "/_/health";

pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    Json(Health { status: "ok", keys: state.store.len().await })
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Two segments, so `/:key` never matches it and every key stays addressable
    let public = Router::new().route(HEALTH_PATH, get(health));

    let kv_routes = Router::new()
        .route("/", get(kv::list_keys))
        .route(
            "/:key",
            get(kv::get_value).put(kv::update_value).delete(kv::delete_value),
        );

    public
        .merge(kv_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
