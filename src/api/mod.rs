use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::pipeline::SearchPipeline;

pub mod handlers;
pub mod models;

pub struct AppState {
    pub pipeline: SearchPipeline,
    /// Used when the request carries no search key of its own.
    pub fallback_api_key: Option<String>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", post(handlers::search_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
