pub mod routes;
pub mod schema;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/black_scholes", post(routes::black_scholes))
        .route("/barrier_reverse_convertible", post(routes::barrier_reverse_convertible))
        .route("/reverse_convertible", post(routes::barrier_reverse_convertible))
        .route("/api/scenarios", get(routes::get_scenarios))
        .route("/api/counters", get(routes::get_counters))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
