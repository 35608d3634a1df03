use std::sync::Arc;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::error::StoreError;
use crate::export::Snapshot;
use crate::latency::Latency;
use crate::models::UserSettings;
use crate::store::{CycleStore, EntryStore, PredictionStore, SettingsStore};

/// Shared handles to every store, passed to the routers as axum state.
#[derive(Clone)]
pub struct AppState {
    pub entries: EntryStore,
    pub cycles: CycleStore,
    pub settings: SettingsStore,
    pub predictions: PredictionStore,
    pub clock: Arc<dyn Clock>,
    pub prediction_lookback_days: i64,
}

impl AppState {
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let latency = Latency::new(config.simulate_latency);
        Self {
            entries: EntryStore::new(clock.clone(), latency),
            cycles: CycleStore::new(clock.clone(), latency),
            settings: SettingsStore::new(UserSettings::default(), latency),
            predictions: PredictionStore::new(latency),
            clock,
            prediction_lookback_days: config.prediction_lookback_days,
        }
    }

    pub fn from_snapshot(
        snapshot: Snapshot,
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let latency = Latency::new(config.simulate_latency);
        Ok(Self {
            entries: EntryStore::with_entries(snapshot.entries, clock.clone(), latency)?,
            cycles: CycleStore::with_cycles(snapshot.cycles, clock.clone(), latency)?,
            settings: SettingsStore::new(snapshot.settings, latency),
            predictions: PredictionStore::with_history(snapshot.predictions, latency)?,
            clock,
            prediction_lookback_days: config.prediction_lookback_days,
        })
    }
}
