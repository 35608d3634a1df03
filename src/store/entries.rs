use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::StoreError;
use crate::latency::{Latency, Op};
use crate::models::{CheckInEntry, EntryUpdate, NewEntry, PeriodDay, PeriodEpisode, SymptomsByDate};

const KIND: &str = "Cycle entry";

/// Daily check-ins, at most one per date.
#[derive(Clone)]
pub struct EntryStore {
    data: Arc<RwLock<Vec<CheckInEntry>>>,
    clock: Arc<dyn Clock>,
    latency: Latency,
}

impl EntryStore {
    pub fn new(clock: Arc<dyn Clock>, latency: Latency) -> Self {
        Self {
            data: Arc::new(RwLock::new(Vec::new())),
            clock,
            latency,
        }
    }

    /// Store pre-filled with seed entries. Rejects seeds that share a date.
    pub fn with_entries(
        entries: Vec<CheckInEntry>,
        clock: Arc<dyn Clock>,
        latency: Latency,
    ) -> Result<Self, StoreError> {
        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            validate_temperatures(entry)?;
            if !seen.insert(entry.date) {
                return Err(StoreError::DateTaken(entry.date));
            }
        }
        Ok(Self {
            data: Arc::new(RwLock::new(entries)),
            clock,
            latency,
        })
    }

    pub async fn get_all(&self) -> Vec<CheckInEntry> {
        self.latency.wait(Op::FetchAll).await;
        self.data.read().await.clone()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CheckInEntry, StoreError> {
        self.latency.wait(Op::FetchOne).await;
        self.data
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: KIND, id })
    }

    /// Entries whose date lies in `start..=end`.
    pub async fn get_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<CheckInEntry> {
        self.latency.wait(Op::FetchRange).await;
        self.data
            .read()
            .await
            .iter()
            .filter(|e| start <= e.date && e.date <= end)
            .cloned()
            .collect()
    }

    /// Entries from the last `days` days, newest first. A window reaching
    /// past the start of the calendar covers every entry.
    pub async fn get_recent(&self, days: i64) -> Vec<CheckInEntry> {
        self.latency.wait(Op::FetchRecent).await;
        let cutoff = Duration::try_days(days)
            .and_then(|span| self.clock.today().checked_sub_signed(span))
            .unwrap_or(NaiveDate::MIN);
        let mut recent: Vec<CheckInEntry> = self
            .data
            .read()
            .await
            .iter()
            .filter(|e| e.date >= cutoff)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent
    }

    pub async fn create(&self, new: NewEntry) -> Result<CheckInEntry, StoreError> {
        self.latency.wait(Op::Create).await;
        let date = new.date.unwrap_or_else(|| self.clock.today());
        let entry = CheckInEntry::from_new(Uuid::now_v7(), date, new);
        validate_temperatures(&entry)?;

        let mut data = self.data.write().await;
        if data.iter().any(|e| e.date == date) {
            return Err(StoreError::DateTaken(date));
        }
        data.push(entry.clone());
        tracing::info!(id = %entry.id, %date, flow = entry.flow.as_str(), "check-in created");
        Ok(entry)
    }

    pub async fn update(&self, id: Uuid, update: EntryUpdate) -> Result<CheckInEntry, StoreError> {
        self.latency.wait(Op::Update).await;
        let mut data = self.data.write().await;
        let index = data
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound { kind: KIND, id })?;

        let mut updated = data[index].clone();
        updated.apply(update);
        validate_temperatures(&updated)?;
        if data.iter().any(|e| e.id != id && e.date == updated.date) {
            return Err(StoreError::DateTaken(updated.date));
        }

        data[index] = updated.clone();
        tracing::info!(%id, "check-in updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.latency.wait(Op::Delete).await;
        let mut data = self.data.write().await;
        let index = data
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound { kind: KIND, id })?;
        data.remove(index);
        tracing::info!(%id, "check-in deleted");
        Ok(())
    }

    /// Symptoms logged per day, oldest day first. Days without symptoms are skipped.
    pub async fn symptoms_by_date(&self) -> Vec<SymptomsByDate> {
        self.latency.wait(Op::FetchAll).await;
        let mut map = BTreeMap::<NaiveDate, Vec<_>>::new();
        for entry in self.data.read().await.iter() {
            if !entry.symptoms.is_empty() {
                map.entry(entry.date)
                    .or_default()
                    .extend(entry.symptoms.iter().copied());
            }
        }
        map.into_iter()
            .map(|(date, symptoms)| SymptomsByDate { date, symptoms })
            .collect()
    }

    pub async fn period_history(&self) -> Vec<PeriodEpisode> {
        self.latency.wait(Op::FetchAll).await;
        group_periods(&self.data.read().await)
    }
}

/// Groups flow days into episodes of consecutive calendar days.
pub fn group_periods(entries: &[CheckInEntry]) -> Vec<PeriodEpisode> {
    let mut days: Vec<PeriodDay> = entries
        .iter()
        .filter(|e| e.flow.is_period())
        .map(|e| PeriodDay {
            date: e.date,
            flow: e.flow,
        })
        .collect();
    days.sort_by_key(|d| d.date);

    let mut grouped: Vec<PeriodEpisode> = vec![];
    let mut current: Vec<PeriodDay> = vec![];

    for day in days {
        let continues = current
            .last()
            .is_some_and(|prev| (day.date - prev.date).num_days() == 1);
        if !continues {
            if let Some(episode) = close_episode(&mut current) {
                grouped.push(episode);
            }
        }
        current.push(day);
    }
    if let Some(episode) = close_episode(&mut current) {
        grouped.push(episode);
    }

    grouped
}

fn close_episode(days: &mut Vec<PeriodDay>) -> Option<PeriodEpisode> {
    let start_date = days.first()?.date;
    let end_date = days.last()?.date;
    Some(PeriodEpisode {
        start_date,
        end_date,
        days: days.drain(..).collect(),
    })
}

fn validate_temperatures(entry: &CheckInEntry) -> Result<(), StoreError> {
    for (field, value) in [
        ("temperature", entry.temperature),
        ("basal_body_temp", entry.basal_body_temp),
    ] {
        if value.is_some_and(|t| !t.is_finite()) {
            return Err(StoreError::Invalid(format!("{field} must be a finite number")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{Flow, Symptom};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn store() -> EntryStore {
        EntryStore::new(Arc::new(FixedClock::new(today())), Latency::disabled())
    }

    fn on(date: NaiveDate, flow: Flow) -> NewEntry {
        NewEntry {
            date: Some(date),
            flow,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_defaults_date_to_today_and_assigns_unique_ids() {
        let store = store();
        let a = store.create(NewEntry::default()).await.unwrap();
        let b = store
            .create(on(today() - Duration::days(1), Flow::Light))
            .await
            .unwrap();

        assert_eq!(a.date, today());
        assert_ne!(a.id, b.id);
        assert_eq!(store.get_by_id(a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn create_rejects_a_second_entry_for_the_same_day() {
        let store = store();
        store.create(on(today(), Flow::Heavy)).await.unwrap();
        let err = store.create(on(today(), Flow::Light)).await.unwrap_err();

        assert_eq!(err, StoreError::DateTaken(today()));
        assert_eq!(store.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_id_leaves_store_untouched() {
        let store = store();
        let kept = store.create(on(today(), Flow::Medium)).await.unwrap();

        let missing = Uuid::now_v7();
        let err = store.delete(missing).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound { kind: KIND, id: missing });
        assert_eq!(store.get_all().await, vec![kept]);
    }

    #[tokio::test]
    async fn update_merges_fields_and_guards_dates() {
        let store = store();
        let first = store.create(on(today(), Flow::Light)).await.unwrap();
        let other_day = today() - Duration::days(3);
        store.create(on(other_day, Flow::None)).await.unwrap();

        let updated = store
            .update(
                first.id,
                EntryUpdate {
                    flow: Some(Flow::Heavy),
                    notes: Some("rough day".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.flow, Flow::Heavy);
        assert_eq!(updated.notes, "rough day");
        assert_eq!(updated.date, today());

        let clash = EntryUpdate {
            date: Some(other_day),
            ..Default::default()
        };
        assert_eq!(
            store.update(first.id, clash).await.unwrap_err(),
            StoreError::DateTaken(other_day)
        );
        assert_eq!(store.get_by_id(first.id).await.unwrap().date, today());
    }

    #[tokio::test]
    async fn non_finite_temperature_is_rejected() {
        let store = store();
        let new = NewEntry {
            temperature: Some(f64::NAN),
            ..Default::default()
        };
        assert!(matches!(store.create(new).await, Err(StoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn range_is_inclusive_and_recent_is_newest_first() {
        let store = store();
        for offset in [0, 5, 10, 40] {
            store
                .create(on(today() - Duration::days(offset), Flow::None))
                .await
                .unwrap();
        }

        let range = store
            .get_by_date_range(today() - Duration::days(10), today() - Duration::days(5))
            .await;
        assert_eq!(range.len(), 2);

        let recent: Vec<NaiveDate> = store.get_recent(30).await.iter().map(|e| e.date).collect();
        assert_eq!(
            recent,
            vec![today(), today() - Duration::days(5), today() - Duration::days(10)]
        );
    }

    #[tokio::test]
    async fn oversized_recent_window_returns_everything() {
        let store = store();
        store.create(on(today(), Flow::None)).await.unwrap();
        store
            .create(on(today() - Duration::days(4000), Flow::Light))
            .await
            .unwrap();

        assert_eq!(store.get_recent(1_000_000_000).await.len(), 2);
        assert_eq!(store.get_recent(i64::MAX).await.len(), 2);
    }

    #[tokio::test]
    async fn symptoms_are_grouped_by_day() {
        let store = store();
        let mut new = on(today(), Flow::None);
        new.symptoms = [Symptom::Cramps, Symptom::Fatigue].into_iter().collect();
        store.create(new).await.unwrap();
        store.create(on(today() - Duration::days(1), Flow::None)).await.unwrap();

        let grouped = store.symptoms_by_date().await;
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].date, today());
        assert_eq!(grouped[0].symptoms, vec![Symptom::Cramps, Symptom::Fatigue]);
    }

    #[test]
    fn consecutive_flow_days_form_one_episode() {
        let d = |n: i64| today() + Duration::days(n);
        let entries: Vec<CheckInEntry> = [
            (0, Flow::Heavy),
            (1, Flow::Medium),
            (2, Flow::Light),
            (3, Flow::None),
            (28, Flow::Heavy),
            (29, Flow::Light),
        ]
        .into_iter()
        .map(|(n, flow)| CheckInEntry::from_new(Uuid::now_v7(), d(n), on(d(n), flow)))
        .collect();

        let episodes = group_periods(&entries);
        assert_eq!(episodes.len(), 2);
        assert_eq!((episodes[0].start_date, episodes[0].end_date), (d(0), d(2)));
        assert_eq!(episodes[0].days.len(), 3);
        assert_eq!((episodes[1].start_date, episodes[1].end_date), (d(28), d(29)));
    }

    #[test]
    fn seeding_with_duplicate_dates_fails() {
        let entry = CheckInEntry::from_new(Uuid::now_v7(), today(), NewEntry::default());
        let twin = CheckInEntry::from_new(Uuid::now_v7(), today(), NewEntry::default());
        let result = EntryStore::with_entries(
            vec![entry, twin],
            Arc::new(FixedClock::new(today())),
            Latency::disabled(),
        );
        assert!(matches!(result, Err(StoreError::DateTaken(_))));
    }
}
