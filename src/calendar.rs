//! Month grid and current-cycle overview.

use std::iter::successors;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{CheckInEntry, Cycle, CycleOverview, CyclePhase, Flow, Prediction};
use crate::prediction::DEFAULT_CYCLE_LENGTH;

#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub flow: Option<Flow>,
    pub is_today: bool,
    pub is_other_month: bool,
    pub is_predicted_period: bool,
    pub is_fertile: bool,
}

#[derive(Debug, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub title: String,
    /// Whole weeks, Sunday through Saturday.
    pub days: Vec<CalendarDay>,
}

/// Builds the grid for `year`/`month`, or `None` for an invalid month.
pub fn month_view(
    year: i32,
    month: u32,
    entries: &[CheckInEntry],
    prediction: Option<&Prediction>,
    today: NaiveDate,
) -> Option<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = if month == 12 {
        NaiveDate::from_ymd_opt(year, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?
    };

    // The grid is cut short at the edges of the representable calendar.
    let grid_start = Duration::try_days(i64::from(first.weekday().num_days_from_sunday()))
        .and_then(|lead| first.checked_sub_signed(lead))
        .unwrap_or(NaiveDate::MIN);
    let grid_end = Duration::try_days(6 - i64::from(last.weekday().num_days_from_sunday()))
        .and_then(|trail| last.checked_add_signed(trail))
        .unwrap_or(NaiveDate::MAX);

    let days = successors(Some(grid_start), NaiveDate::succ_opt)
        .take_while(|d| *d <= grid_end)
        .map(|date| CalendarDay {
            date,
            flow: entries.iter().find(|e| e.date == date).map(|e| e.flow),
            is_today: date == today,
            is_other_month: date.month() != month,
            is_predicted_period: prediction.is_some_and(|p| p.in_predicted_period(date)),
            is_fertile: prediction.is_some_and(|p| p.in_fertile_window(date)),
        })
        .collect();

    Some(CalendarMonth {
        year,
        month,
        title: first.format("%B %Y").to_string(),
        days,
    })
}

/// Where today falls in the current cycle.
pub fn cycle_overview(
    cycle: Option<&Cycle>,
    prediction: Option<&Prediction>,
    today: NaiveDate,
) -> CycleOverview {
    let days_until_next_period = prediction
        .map(|p| (p.next_period_start - today).num_days().max(0))
        .unwrap_or(0);
    let confidence = prediction.map(|p| p.confidence).unwrap_or(0.0);

    let (Some(cycle), Some(_)) = (cycle, prediction) else {
        return CycleOverview {
            phase: CyclePhase::Unknown,
            cycle_day: 0,
            cycle_total: DEFAULT_CYCLE_LENGTH,
            progress_percent: 0.0,
            days_until_next_period,
            confidence,
            start_date: cycle.map(|c| c.start_date),
        };
    };

    let cycle_day = ((today - cycle.start_date).num_days() + 1).max(1);
    let total = if cycle.length > 0 { cycle.length } else { DEFAULT_CYCLE_LENGTH };

    CycleOverview {
        phase: CyclePhase::for_day(cycle_day),
        cycle_day,
        cycle_total: total,
        progress_percent: cycle_day as f64 / f64::from(total) * 100.0,
        days_until_next_period,
        confidence,
        start_date: Some(cycle.start_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEntry;
    use chrono::Weekday;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn prediction(next: NaiveDate) -> Prediction {
        let ovulation = next - Duration::days(14);
        Prediction {
            next_period_start: next,
            fertile_window_start: ovulation - Duration::days(5),
            fertile_window_end: ovulation + Duration::days(1),
            confidence: 0.6,
            average_cycle_length: 28,
            sample_count: 2,
        }
    }

    #[test]
    fn grid_covers_whole_weeks() {
        // June 2024 starts on a Saturday and ends on a Sunday.
        let view = month_view(2024, 6, &[], None, date(2024, 6, 10)).unwrap();
        assert_eq!(view.days.len() % 7, 0);
        assert_eq!(view.days.len(), 42);
        assert_eq!(view.days[0].date, date(2024, 5, 26));
        assert_eq!(view.days[0].date.weekday(), Weekday::Sun);
        assert!(view.days[0].is_other_month);
        assert_eq!(view.days.last().unwrap().date.weekday(), Weekday::Sat);
        assert_eq!(view.title, "June 2024");
        assert_eq!(view.days.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn december_rolls_into_next_year() {
        let view = month_view(2023, 12, &[], None, date(2024, 1, 1)).unwrap();
        assert_eq!(view.days.last().unwrap().date, date(2024, 1, 6));

        let new_year = view.days.iter().find(|d| d.date == date(2024, 1, 1)).unwrap();
        assert!(new_year.is_today);
        assert!(new_year.is_other_month);
    }

    #[test]
    fn months_at_the_calendar_edges_still_render() {
        let min = NaiveDate::MIN;
        let view = month_view(min.year(), min.month(), &[], None, date(2024, 1, 1)).unwrap();
        assert_eq!(view.days[0].date, min);
        assert_eq!(view.days.last().unwrap().date.weekday(), Weekday::Sat);

        let max = NaiveDate::MAX;
        let p = prediction(max - Duration::days(2));
        let view = month_view(max.year(), max.month(), &[], Some(&p), date(2024, 1, 1)).unwrap();
        assert_eq!(view.days[0].date.weekday(), Weekday::Sun);
        assert_eq!(view.days.last().unwrap().date, max);
        assert!(view.days.last().unwrap().is_predicted_period);
    }

    #[test]
    fn invalid_month_has_no_view() {
        assert!(month_view(2024, 13, &[], None, date(2024, 1, 1)).is_none());
        assert!(month_view(2024, 0, &[], None, date(2024, 1, 1)).is_none());
    }

    #[test]
    fn marks_entries_prediction_and_fertile_days() {
        let entry = CheckInEntry::from_new(
            Uuid::now_v7(),
            date(2024, 6, 3),
            NewEntry {
                flow: Flow::Heavy,
                ..Default::default()
            },
        );
        let p = prediction(date(2024, 6, 28));
        let view = month_view(2024, 6, &[entry], Some(&p), date(2024, 6, 1)).unwrap();
        let find = |d: NaiveDate| view.days.iter().find(|c| c.date == d).unwrap();

        assert_eq!(find(date(2024, 6, 3)).flow, Some(Flow::Heavy));
        assert!(find(date(2024, 6, 28)).is_predicted_period);
        assert!(find(date(2024, 7, 3)).is_predicted_period);
        assert!(!find(date(2024, 6, 27)).is_predicted_period);
        // ovulation on the 14th
        assert!(find(date(2024, 6, 9)).is_fertile);
        assert!(find(date(2024, 6, 15)).is_fertile);
        assert!(!find(date(2024, 6, 16)).is_fertile);
    }

    #[test]
    fn overview_reports_phase_and_countdown() {
        let cycle = Cycle {
            id: Uuid::now_v7(),
            start_date: date(2024, 6, 1),
            end_date: None,
            length: 28,
        };
        let p = prediction(date(2024, 6, 29));

        let overview = cycle_overview(Some(&cycle), Some(&p), date(2024, 6, 14));
        assert_eq!(overview.cycle_day, 14);
        assert_eq!(overview.phase, CyclePhase::Ovulation);
        assert_eq!(overview.days_until_next_period, 15);
        assert!((overview.progress_percent - 50.0).abs() < 1e-9);

        let late = cycle_overview(Some(&cycle), Some(&p), date(2024, 7, 2));
        assert_eq!(late.phase, CyclePhase::Luteal);
        assert_eq!(late.days_until_next_period, 0);
    }

    #[test]
    fn overview_without_prediction_is_unknown() {
        let overview = cycle_overview(None, None, date(2024, 6, 14));
        assert_eq!(overview.phase, CyclePhase::Unknown);
        assert_eq!(overview.cycle_day, 0);
        assert_eq!(overview.cycle_total, 28);
    }
}
