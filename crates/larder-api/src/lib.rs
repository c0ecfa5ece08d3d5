mod routes;
mod state;

use std::sync::Arc;

use axum::{routing::get, Router};

pub use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/inventory", get(routes::inventory))
        .route("/forecast", get(routes::forecast))
        .route("/shipments", get(routes::shipments))
        .route("/health", get(routes::health))
        .with_state(state)
}
