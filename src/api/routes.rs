use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::status_text))
        // Feed endpoints
        .route("/api/taixiu", get(handlers::get_latest_standard))
        .route("/api/taixiumd5", get(handlers::get_latest_md5))
        .route("/api/history", get(handlers::get_history))
        // Operational endpoints
        .route("/healthz", get(handlers::liveness_handler))
        .route("/api/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
