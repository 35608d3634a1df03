//! JSON snapshots of everything in memory, for download or for seeding.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CheckInEntry, Cycle, Prediction, UserSettings};
use crate::state::AppState;

pub const APP_NAME: &str = "Luna Cycle";

#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub app: String,
    pub export_date: DateTime<Utc>,
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default)]
    pub entries: Vec<CheckInEntry>,
    #[serde(default)]
    pub cycles: Vec<Cycle>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

impl Snapshot {
    pub async fn capture(state: &AppState) -> Self {
        Self {
            app: APP_NAME.to_string(),
            export_date: Utc::now(),
            settings: state.settings.get().await,
            entries: state.entries.get_all().await,
            cycles: state.cycles.get_all().await,
            predictions: state.predictions.history().await,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
    }
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("luna-cycle-data-{}.json", today.format("%Y-%m-%d"))
}
