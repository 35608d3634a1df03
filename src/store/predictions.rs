use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{PredictionError, StoreError};
use crate::latency::{Latency, Op};
use crate::models::{Prediction, PredictionUpdate};
use crate::prediction::{predict, MAX_CONFIDENCE};
use crate::store::EntryStore;

/// Predictions kept, newest first.
pub const HISTORY_LIMIT: usize = 3;

#[derive(Clone)]
pub struct PredictionStore {
    history: Arc<RwLock<Vec<Prediction>>>,
    latency: Latency,
}

impl PredictionStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            history: Arc::new(RwLock::new(Vec::new())),
            latency,
        }
    }

    /// Store pre-filled with seed predictions, newest first. Confidence is
    /// clamped like a patched one; non-finite values and inverted windows fail.
    pub fn with_history(mut history: Vec<Prediction>, latency: Latency) -> Result<Self, StoreError> {
        history.truncate(HISTORY_LIMIT);
        for prediction in &mut history {
            prediction.confidence = clamp_confidence(prediction.confidence)?;
            check_window(prediction)?;
        }
        Ok(Self {
            history: Arc::new(RwLock::new(history)),
            latency,
        })
    }

    pub async fn current(&self) -> Option<Prediction> {
        self.latency.wait(Op::FetchOne).await;
        self.history.read().await.first().cloned()
    }

    pub async fn history(&self) -> Vec<Prediction> {
        self.latency.wait(Op::FetchAll).await;
        self.history.read().await.clone()
    }

    /// Predicts from the last `lookback_days` of check-ins and records the result.
    pub async fn generate(
        &self,
        entries: &EntryStore,
        lookback_days: i64,
    ) -> Result<Prediction, PredictionError> {
        self.latency.wait(Op::Predict).await;
        let recent = entries.get_recent(lookback_days).await;
        let prediction = predict(&recent)?;
        self.record(prediction.clone()).await;

        tracing::info!(
            next_period = %prediction.next_period_start,
            samples = prediction.sample_count,
            confidence = prediction.confidence,
            "prediction generated"
        );
        Ok(prediction)
    }

    async fn record(&self, prediction: Prediction) {
        let mut history = self.history.write().await;
        history.insert(0, prediction);
        history.truncate(HISTORY_LIMIT);
    }

    /// Patches the most recent prediction.
    pub async fn update(&self, update: PredictionUpdate) -> Result<Prediction, StoreError> {
        self.latency.wait(Op::Update).await;
        let mut history = self.history.write().await;
        let current = history.first_mut().ok_or(StoreError::NoPrediction)?;

        let mut patched = current.clone();
        if let Some(v) = update.next_period_start {
            patched.next_period_start = v;
        }
        if let Some(v) = update.fertile_window_start {
            patched.fertile_window_start = v;
        }
        if let Some(v) = update.fertile_window_end {
            patched.fertile_window_end = v;
        }
        if let Some(v) = update.confidence {
            patched.confidence = clamp_confidence(v)?;
        }
        check_window(&patched)?;

        *current = patched.clone();
        Ok(patched)
    }
}

fn clamp_confidence(value: f64) -> Result<f64, StoreError> {
    if !value.is_finite() {
        return Err(StoreError::Invalid("confidence must be a finite number".into()));
    }
    Ok(value.clamp(0.0, MAX_CONFIDENCE))
}

fn check_window(prediction: &Prediction) -> Result<(), StoreError> {
    if prediction.fertile_window_end < prediction.fertile_window_start {
        return Err(StoreError::Invalid("fertile window ends before it starts".into()));
    }
    Ok(())
}
