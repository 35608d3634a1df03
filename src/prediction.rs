//! Cycle-length estimation and next-period / fertile-window prediction.

use chrono::{Duration, NaiveDate};

use crate::error::PredictionError;
use crate::models::{CheckInEntry, Prediction};

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
pub const MAX_CONFIDENCE: f64 = 0.95;
const BASE_CONFIDENCE: f64 = 0.4;
const CONFIDENCE_PER_SAMPLE: f64 = 0.1;
const LUTEAL_PHASE_DAYS: i64 = 14;

/// A plausible cycle length lies strictly between these bounds.
const SAMPLE_MIN_EXCLUSIVE: i64 = 20;
const SAMPLE_MAX_EXCLUSIVE: i64 = 40;

/// A cycle-length sample: the gap between two adjacent period-start markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSample {
    pub from: NaiveDate,
    pub days: i64,
}

/// Dates of medium/heavy entries in chronological order.
pub fn period_start_markers(entries: &[CheckInEntry]) -> Vec<NaiveDate> {
    let mut markers: Vec<NaiveDate> = entries
        .iter()
        .filter(|e| e.flow.marks_period_start())
        .map(|e| e.date)
        .collect();
    markers.sort();
    markers
}

/// Gaps between adjacent markers that fall strictly inside (20, 40) days.
pub fn cycle_samples(entries: &[CheckInEntry]) -> Vec<CycleSample> {
    period_start_markers(entries)
        .windows(2)
        .map(|pair| CycleSample {
            from: pair[0],
            days: (pair[1] - pair[0]).num_days(),
        })
        .filter(|s| s.days > SAMPLE_MIN_EXCLUSIVE && s.days < SAMPLE_MAX_EXCLUSIVE)
        .collect()
}

/// Arithmetic mean of the samples, `None` when there are none.
pub fn mean_cycle_length(samples: &[CycleSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let total: i64 = samples.iter().map(|s| s.days).sum();
    Some(total as f64 / samples.len() as f64)
}

/// Mean rounded to whole days, falling back to 28.
pub fn average_cycle_length(samples: &[CycleSample]) -> u32 {
    mean_cycle_length(samples)
        .map(|mean| mean.round() as u32)
        .unwrap_or(DEFAULT_CYCLE_LENGTH)
}

pub fn confidence_for(sample_count: usize) -> f64 {
    (BASE_CONFIDENCE + CONFIDENCE_PER_SAMPLE * sample_count as f64).clamp(0.0, MAX_CONFIDENCE)
}

/// Predicts the next period and fertile window from check-in history.
///
/// Fails when no entry reports any flow, or when the predicted dates would
/// fall past the end of the calendar.
pub fn predict(entries: &[CheckInEntry]) -> Result<Prediction, PredictionError> {
    let last_flow_day = entries
        .iter()
        .filter(|e| e.flow.is_period())
        .map(|e| e.date)
        .max()
        .ok_or(PredictionError::InsufficientData)?;

    let samples = cycle_samples(entries);
    let average = average_cycle_length(&samples);

    let last_period_start = period_start_markers(entries)
        .last()
        .copied()
        .unwrap_or(last_flow_day);

    let shift = |date: NaiveDate, days: i64| {
        date.checked_add_signed(Duration::days(days))
            .ok_or(PredictionError::DateOutOfRange)
    };
    let next_period_start = shift(last_period_start, i64::from(average))?;
    let ovulation = shift(next_period_start, -LUTEAL_PHASE_DAYS)?;

    Ok(Prediction {
        next_period_start,
        fertile_window_start: shift(ovulation, -5)?,
        fertile_window_end: shift(ovulation, 1)?,
        confidence: confidence_for(samples.len()),
        average_cycle_length: average,
        sample_count: samples.len(),
    })
}
