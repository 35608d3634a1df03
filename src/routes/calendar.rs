use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use serde::Deserialize;

use crate::calendar::{month_view, CalendarMonth};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/calendar", get(get_calendar_month))
        .with_state(state)
}

/// Defaults to the current month.
async fn get_calendar_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CalendarMonth>, ApiError> {
    let today = state.clock.today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let entries = state.entries.get_all().await;
    let prediction = state.predictions.current().await;

    month_view(year, month, &entries, prediction.as_ref(), today)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid month {year}-{month:02}")))
}
