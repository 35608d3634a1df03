use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::calendar::cycle_overview;
use crate::error::ApiError;
use crate::insights::cycle_stats;
use crate::models::{Cycle, CycleOverview, CycleStatsResponse, CycleUpdate, NewCycle};
use crate::state::AppState;

const DEFAULT_RECENT_COUNT: usize = 6;

#[derive(Deserialize)]
pub struct RecentQuery {
    pub count: Option<usize>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycles", get(list_cycles).post(create_cycle))
        .route("/cycles/current", get(current_cycle))
        .route("/cycles/recent", get(recent_cycles))
        .route("/cycles/stats", get(get_cycle_stats))
        .route("/cycles/overview", get(get_cycle_overview))
        .route(
            "/cycles/:id",
            get(get_cycle).patch(update_cycle).delete(delete_cycle),
        )
        .with_state(state)
}

async fn list_cycles(State(state): State<AppState>) -> Json<Vec<Cycle>> {
    Json(state.cycles.get_all().await)
}

async fn get_cycle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Cycle>, ApiError> {
    Ok(Json(state.cycles.get_by_id(id).await?))
}

async fn create_cycle(
    State(state): State<AppState>,
    Json(body): Json<NewCycle>,
) -> Result<(StatusCode, Json<Cycle>), ApiError> {
    let cycle = state.cycles.create(body).await?;
    Ok((StatusCode::CREATED, Json(cycle)))
}

async fn update_cycle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CycleUpdate>,
) -> Result<Json<Cycle>, ApiError> {
    Ok(Json(state.cycles.update(id, body).await?))
}

async fn delete_cycle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.cycles.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// `null` when today falls outside every recorded cycle.
async fn current_cycle(State(state): State<AppState>) -> Json<Option<Cycle>> {
    Json(state.cycles.get_current().await)
}

async fn recent_cycles(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Json<Vec<Cycle>> {
    let count = query.count.unwrap_or(DEFAULT_RECENT_COUNT);
    Json(state.cycles.get_recent(count).await)
}

async fn get_cycle_stats(State(state): State<AppState>) -> Json<CycleStatsResponse> {
    let cycles = state.cycles.get_all().await;
    let entries = state.entries.get_all().await;
    Json(cycle_stats(&cycles, &entries))
}

async fn get_cycle_overview(State(state): State<AppState>) -> Json<CycleOverview> {
    let cycle = state.cycles.get_current().await;
    let prediction = state.predictions.current().await;
    Json(cycle_overview(
        cycle.as_ref(),
        prediction.as_ref(),
        state.clock.today(),
    ))
}
