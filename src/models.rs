use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==================== Check-in entries ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    #[default]
    None,
    Light,
    Medium,
    Heavy,
}

impl Flow {
    /// Any bleeding at all.
    pub fn is_period(self) -> bool {
        self != Flow::None
    }

    /// Medium and heavy days count as period-start markers.
    pub fn marks_period_start(self) -> bool {
        matches!(self, Flow::Medium | Flow::Heavy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flow::None => "none",
            Flow::Light => "light",
            Flow::Medium => "medium",
            Flow::Heavy => "heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symptom {
    Cramps,
    Headache,
    Fatigue,
    Bloating,
    Nausea,
    Backache,
    Tender,
    Acne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Amazing,
    Good,
    Neutral,
    Tired,
    Moody,
    Irritable,
    Sad,
    Anxious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LhTest {
    Negative,
    Positive,
    Peak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CervicalMucus {
    Dry,
    Sticky,
    Creamy,
    Eggwhite,
}

/// One daily check-in. At most one entry exists per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub flow: Flow,
    #[serde(default)]
    pub symptoms: BTreeSet<Symptom>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub basal_body_temp: Option<f64>,
    #[serde(default)]
    pub lh_test: Option<LhTest>,
    #[serde(default)]
    pub cervical_mucus: Option<CervicalMucus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEntry {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub flow: Flow,
    #[serde(default)]
    pub symptoms: BTreeSet<Symptom>,
    pub mood: Option<Mood>,
    #[serde(default)]
    pub notes: String,
    pub temperature: Option<f64>,
    pub basal_body_temp: Option<f64>,
    pub lh_test: Option<LhTest>,
    pub cervical_mucus: Option<CervicalMucus>,
}

/// Merge patch for an entry; absent fields are left untouched and an
/// explicit `null` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryUpdate {
    pub date: Option<NaiveDate>,
    pub flow: Option<Flow>,
    pub symptoms: Option<BTreeSet<Symptom>>,
    #[serde(default, deserialize_with = "double_option")]
    pub mood: Option<Option<Mood>>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub temperature: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub basal_body_temp: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lh_test: Option<Option<LhTest>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cervical_mucus: Option<Option<CervicalMucus>>,
}

// Present-but-null becomes `Some(None)`; a missing field stays `None` via `default`.
fn double_option<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

impl CheckInEntry {
    pub fn from_new(id: Uuid, date: NaiveDate, new: NewEntry) -> Self {
        Self {
            id,
            date,
            flow: new.flow,
            symptoms: new.symptoms,
            mood: new.mood,
            notes: new.notes,
            temperature: new.temperature,
            basal_body_temp: new.basal_body_temp,
            lh_test: new.lh_test,
            cervical_mucus: new.cervical_mucus,
        }
    }

    pub fn apply(&mut self, update: EntryUpdate) {
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(flow) = update.flow {
            self.flow = flow;
        }
        if let Some(symptoms) = update.symptoms {
            self.symptoms = symptoms;
        }
        if let Some(mood) = update.mood {
            self.mood = mood;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(t) = update.temperature {
            self.temperature = t;
        }
        if let Some(t) = update.basal_body_temp {
            self.basal_body_temp = t;
        }
        if let Some(lh) = update.lh_test {
            self.lh_test = lh;
        }
        if let Some(mucus) = update.cervical_mucus {
            self.cervical_mucus = mucus;
        }
    }
}

#[derive(Serialize)]
pub struct SymptomsByDate {
    pub date: NaiveDate,
    pub symptoms: Vec<Symptom>,
}

#[derive(Debug, Serialize)]
pub struct PeriodEpisode {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<PeriodDay>,
}

#[derive(Debug, Serialize)]
pub struct PeriodDay {
    pub date: NaiveDate,
    pub flow: Flow,
}

// ==================== Cycles ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: Uuid,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub length: u32,
}

impl Cycle {
    /// Stored end date, or one synthesized from the cycle length.
    /// Saturates at the last representable date.
    pub fn effective_end(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| {
            self.start_date
                .checked_add_signed(Duration::days(i64::from(self.length)))
                .unwrap_or(NaiveDate::MAX)
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.effective_end()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCycle {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub length: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub length: Option<u32>,
}

impl Cycle {
    pub fn apply(&mut self, update: CycleUpdate) {
        if let Some(start) = update.start_date {
            self.start_date = start;
        }
        if let Some(end) = update.end_date {
            self.end_date = Some(end);
        }
        if let Some(length) = update.length {
            self.length = length;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CycleStat {
    pub cycle_number: u32,
    pub start_date: NaiveDate,
    pub period_length: u32,
    pub cycle_length: u32,
}

#[derive(Debug, Serialize)]
pub struct CycleStatsResponse {
    pub average_period_length: f64,
    pub average_cycle_length: f64,
    pub cycle_stats: Vec<CycleStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
    Unknown,
}

impl CyclePhase {
    pub fn for_day(day_in_cycle: i64) -> Self {
        match day_in_cycle {
            ..=5 => CyclePhase::Menstrual,
            6..=13 => CyclePhase::Follicular,
            14..=15 => CyclePhase::Ovulation,
            _ => CyclePhase::Luteal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CycleOverview {
    pub phase: CyclePhase,
    pub cycle_day: i64,
    pub cycle_total: u32,
    pub progress_percent: f64,
    pub days_until_next_period: i64,
    pub confidence: f64,
    pub start_date: Option<NaiveDate>,
}

// ==================== Predictions ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub next_period_start: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    pub confidence: f64,
    #[serde(default = "default_cycle_length")]
    pub average_cycle_length: u32,
    #[serde(default)]
    pub sample_count: usize,
}

impl Prediction {
    pub fn in_fertile_window(&self, date: NaiveDate) -> bool {
        self.fertile_window_start <= date && date <= self.fertile_window_end
    }

    /// The predicted period is drawn as six days from its first day.
    pub fn in_predicted_period(&self, date: NaiveDate) -> bool {
        let last = self
            .next_period_start
            .checked_add_signed(Duration::days(5))
            .unwrap_or(NaiveDate::MAX);
        self.next_period_start <= date && date <= last
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionUpdate {
    pub next_period_start: Option<NaiveDate>,
    pub fertile_window_start: Option<NaiveDate>,
    pub fertile_window_end: Option<NaiveDate>,
    pub confidence: Option<f64>,
}

// ==================== Settings ====================

pub const MIN_CYCLE_LENGTH: u32 = 20;
pub const MAX_CYCLE_LENGTH: u32 = 40;
/// Upper bound for a recorded cycle's length in days.
pub const MAX_RECORDED_CYCLE_DAYS: u32 = 365;

fn default_cycle_length() -> u32 {
    28
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Purple,
    Pink,
    Green,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
    pub cycle_reminders: bool,
    pub insight_updates: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
            cycle_reminders: true,
            insight_updates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub average_cycle_length: u32,
    #[serde(with = "hh_mm")]
    pub reminder_time: NaiveTime,
    pub notifications_enabled: bool,
    pub privacy_mode: bool,
    pub fertility_mode: bool,
    pub theme: Theme,
    pub language: String,
    pub units: Units,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            average_cycle_length: default_cycle_length(),
            reminder_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            notifications_enabled: true,
            privacy_mode: false,
            fertility_mode: false,
            theme: Theme::default(),
            language: "en".to_string(),
            units: Units::default(),
            profile: Profile::default(),
            notifications: NotificationPreferences::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub average_cycle_length: Option<u32>,
    #[serde(default, deserialize_with = "hh_mm::option::deserialize")]
    pub reminder_time: Option<NaiveTime>,
    pub notifications_enabled: Option<bool>,
    pub privacy_mode: Option<bool>,
    pub fertility_mode: Option<bool>,
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub units: Option<Units>,
    pub notifications: Option<NotificationPreferences>,
}

/// Settings and profile serialize reminder times as `HH:MM`.
mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer};

        use super::FORMAT;

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|raw| NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
