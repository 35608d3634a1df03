use axum::{extract::State, routing::get, Json, Router};

use crate::insights::{summarize, Insights};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/insights", get(get_insights))
        .with_state(state)
}

/// `null` until the first check-in exists.
async fn get_insights(State(state): State<AppState>) -> Json<Option<Insights>> {
    let entries = state.entries.get_all().await;
    Json(summarize(&entries))
}
