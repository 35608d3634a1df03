use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CheckInEntry, EntryUpdate, NewEntry, PeriodEpisode, SymptomsByDate};
use crate::state::AppState;

const DEFAULT_RECENT_DAYS: i64 = 30;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
pub struct RecentQuery {
    pub days: Option<i64>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/range", get(entries_in_range))
        .route("/entries/recent", get(recent_entries))
        .route("/entries/symptoms", get(symptoms_grouped))
        .route("/entries/periods", get(period_history))
        .route(
            "/entries/:id",
            get(get_entry).patch(update_entry).delete(delete_entry),
        )
        .with_state(state)
}

async fn list_entries(State(state): State<AppState>) -> Json<Vec<CheckInEntry>> {
    Json(state.entries.get_all().await)
}

async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CheckInEntry>, ApiError> {
    Ok(Json(state.entries.get_by_id(id).await?))
}

async fn create_entry(
    State(state): State<AppState>,
    Json(body): Json<NewEntry>,
) -> Result<(StatusCode, Json<CheckInEntry>), ApiError> {
    let entry = state.entries.create(body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<EntryUpdate>,
) -> Result<Json<CheckInEntry>, ApiError> {
    Ok(Json(state.entries.update(id, body).await?))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.entries.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn entries_in_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<CheckInEntry>>, ApiError> {
    if query.start > query.end {
        return Err(ApiError::BadRequest(format!(
            "range start {} is after end {}",
            query.start, query.end
        )));
    }
    Ok(Json(state.entries.get_by_date_range(query.start, query.end).await))
}

async fn recent_entries(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<CheckInEntry>>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_RECENT_DAYS);
    if days < 0 {
        return Err(ApiError::BadRequest("days cannot be negative".into()));
    }
    Ok(Json(state.entries.get_recent(days).await))
}

async fn symptoms_grouped(State(state): State<AppState>) -> Json<Vec<SymptomsByDate>> {
    Json(state.entries.symptoms_by_date().await)
}

async fn period_history(State(state): State<AppState>) -> Json<Vec<PeriodEpisode>> {
    Json(state.entries.period_history().await)
}
