use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::error::ApiError;
use crate::models::{Prediction, PredictionUpdate};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/prediction",
            get(current_prediction)
                .post(generate_prediction)
                .patch(update_prediction),
        )
        .route("/prediction/history", get(prediction_history))
        .with_state(state)
}

async fn current_prediction(State(state): State<AppState>) -> Json<Option<Prediction>> {
    Json(state.predictions.current().await)
}

async fn generate_prediction(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Prediction>), ApiError> {
    let prediction = state
        .predictions
        .generate(&state.entries, state.prediction_lookback_days)
        .await?;
    Ok((StatusCode::CREATED, Json(prediction)))
}

async fn update_prediction(
    State(state): State<AppState>,
    Json(body): Json<PredictionUpdate>,
) -> Result<Json<Prediction>, ApiError> {
    Ok(Json(state.predictions.update(body).await?))
}

async fn prediction_history(State(state): State<AppState>) -> Json<Vec<Prediction>> {
    Json(state.predictions.history().await)
}
