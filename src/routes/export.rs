use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::error::ApiError;
use crate::export::{export_filename, Snapshot};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/export", get(export_data))
        .with_state(state)
}

/// Everything in memory as a downloadable JSON file.
async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = Snapshot::capture(&state).await;
    let body = serde_json::to_string_pretty(&snapshot)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(state.clock.today())
    );
    tracing::info!(entries = snapshot.entries.len(), "data exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
