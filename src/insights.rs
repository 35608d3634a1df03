//! Aggregate statistics over check-ins and cycles.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{CheckInEntry, Cycle, CycleStat, CycleStatsResponse, Mood, Symptom};
use crate::prediction::{average_cycle_length, cycle_samples};

const TOP_SYMPTOMS: usize = 6;
const REGULAR_SPREAD_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Consistency {
    Regular,
    Irregular,
    Unknown,
}

#[derive(Debug, Serialize)]
pub struct CycleLengthPoint {
    /// Short month name of the cycle's first marker.
    pub label: String,
    pub days: i64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct SymptomCount {
    pub symptom: Symptom,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct Insights {
    pub average_cycle_length: u32,
    pub total_entries: usize,
    pub most_common_symptom: Option<Symptom>,
    pub most_common_mood: Option<Mood>,
    pub cycle_consistency: Consistency,
    pub cycle_lengths: Vec<CycleLengthPoint>,
    pub symptom_frequency: Vec<SymptomCount>,
}

/// Summarizes the check-in history; `None` when there is nothing to summarize.
pub fn summarize(entries: &[CheckInEntry]) -> Option<Insights> {
    if entries.is_empty() {
        return None;
    }

    let samples = cycle_samples(entries);
    let consistency = if samples.len() > 2 {
        let min = samples.iter().map(|s| s.days).min().unwrap_or_default();
        let max = samples.iter().map(|s| s.days).max().unwrap_or_default();
        if max - min <= REGULAR_SPREAD_DAYS {
            Consistency::Regular
        } else {
            Consistency::Irregular
        }
    } else {
        Consistency::Unknown
    };

    let mut symptom_counts = BTreeMap::<Symptom, usize>::new();
    let mut mood_counts = BTreeMap::<Mood, usize>::new();
    for entry in entries {
        for symptom in &entry.symptoms {
            *symptom_counts.entry(*symptom).or_default() += 1;
        }
        if let Some(mood) = entry.mood {
            *mood_counts.entry(mood).or_default() += 1;
        }
    }

    let mut symptom_frequency: Vec<SymptomCount> = symptom_counts
        .iter()
        .map(|(symptom, count)| SymptomCount {
            symptom: *symptom,
            count: *count,
        })
        .collect();
    symptom_frequency.sort_by(|a, b| b.count.cmp(&a.count));

    Some(Insights {
        average_cycle_length: average_cycle_length(&samples),
        total_entries: entries.len(),
        most_common_symptom: symptom_frequency.first().map(|s| s.symptom),
        most_common_mood: most_common(&mood_counts),
        cycle_consistency: consistency,
        cycle_lengths: samples
            .iter()
            .map(|s| CycleLengthPoint {
                label: s.from.format("%b").to_string(),
                days: s.days,
            })
            .collect(),
        symptom_frequency: symptom_frequency.into_iter().take(TOP_SYMPTOMS).collect(),
    })
}

// Ties go to the smallest key.
fn most_common<K: Copy + Ord>(counts: &BTreeMap<K, usize>) -> Option<K> {
    counts
        .iter()
        .fold(None, |best: Option<(K, usize)>, (key, count)| match best {
            Some((_, top)) if top >= *count => best,
            _ => Some((*key, *count)),
        })
        .map(|(key, _)| key)
}

/// Per-cycle period and cycle lengths, oldest cycle first.
///
/// A cycle runs until the next cycle starts; the latest one uses its own
/// range. Period length counts flow days inside that span.
pub fn cycle_stats(cycles: &[Cycle], entries: &[CheckInEntry]) -> CycleStatsResponse {
    let mut ordered: Vec<&Cycle> = cycles.iter().collect();
    ordered.sort_by_key(|c| c.start_date);

    let mut stats = Vec::with_capacity(ordered.len());
    let mut total_period = 0u64;
    let mut total_cycle = 0u64;

    for (i, cycle) in ordered.iter().enumerate() {
        let next_start = ordered.get(i + 1).map(|next| next.start_date);
        let (cycle_len, last_day) = match next_start {
            Some(next) => ((next - cycle.start_date).num_days(), next.pred_opt().unwrap_or(next)),
            None => (i64::from(cycle.length), cycle.effective_end()),
        };
        let period = count_flow_days(entries, cycle.start_date, last_day);
        let cycle_len = u32::try_from(cycle_len).unwrap_or(0);

        total_period += u64::from(period);
        total_cycle += u64::from(cycle_len);
        stats.push(CycleStat {
            cycle_number: (i + 1) as u32,
            start_date: cycle.start_date,
            period_length: period,
            cycle_length: cycle_len,
        });
    }

    let count = stats.len() as f64;
    CycleStatsResponse {
        average_period_length: if count > 0.0 { total_period as f64 / count } else { 0.0 },
        average_cycle_length: if count > 0.0 { total_cycle as f64 / count } else { 0.0 },
        cycle_stats: stats,
    }
}

fn count_flow_days(entries: &[CheckInEntry], first: NaiveDate, last: NaiveDate) -> u32 {
    entries
        .iter()
        .filter(|e| e.flow.is_period() && first <= e.date && e.date <= last)
        .count() as u32
}
