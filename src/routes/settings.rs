use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::error::ApiError;
use crate::models::{Profile, SettingsUpdate, UserSettings};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/settings", get(get_settings).patch(update_settings))
        .route("/settings/reset", post(reset_settings))
        .route("/profile", get(get_profile).put(update_profile))
        .with_state(state)
}

async fn get_settings(State(state): State<AppState>) -> Json<UserSettings> {
    Json(state.settings.get().await)
}

async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<SettingsUpdate>,
) -> Result<Json<UserSettings>, ApiError> {
    Ok(Json(state.settings.update(body).await?))
}

async fn reset_settings(State(state): State<AppState>) -> Json<UserSettings> {
    Json(state.settings.reset().await)
}

async fn get_profile(State(state): State<AppState>) -> Json<Profile> {
    Json(state.settings.profile().await)
}

async fn update_profile(
    State(state): State<AppState>,
    Json(body): Json<Profile>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.settings.update_profile(body).await?))
}
