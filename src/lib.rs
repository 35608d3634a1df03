//! Luna Cycle backend: in-memory cycle tracking with a small prediction
//! heuristic, served over a JSON HTTP API.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod insights;
pub mod latency;
pub mod models;
pub mod prediction;
pub mod routes;
pub mod state;
pub mod store;

use axum::{routing::get, Router};

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use error::{ApiError, PredictionError, StoreError};
pub use state::AppState;

/// Every router merged over one shared state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::entries::routes(state.clone()))
        .merge(routes::cycles::routes(state.clone()))
        .merge(routes::settings::routes(state.clone()))
        .merge(routes::prediction::routes(state.clone()))
        .merge(routes::insights::routes(state.clone()))
        .merge(routes::calendar::routes(state.clone()))
        .merge(routes::export::routes(state))
        .route("/health", get(|| async { "✅ Backend up" }))
}
