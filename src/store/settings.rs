use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::latency::{Latency, Op};
use crate::models::{Profile, SettingsUpdate, UserSettings, MAX_CYCLE_LENGTH, MIN_CYCLE_LENGTH};

/// The single settings record for this process.
#[derive(Clone)]
pub struct SettingsStore {
    data: Arc<RwLock<UserSettings>>,
    latency: Latency,
}

impl SettingsStore {
    pub fn new(settings: UserSettings, latency: Latency) -> Self {
        Self {
            data: Arc::new(RwLock::new(settings)),
            latency,
        }
    }

    pub async fn get(&self) -> UserSettings {
        self.latency.wait(Op::FetchOne).await;
        self.data.read().await.clone()
    }

    pub async fn update(&self, update: SettingsUpdate) -> Result<UserSettings, StoreError> {
        self.latency.wait(Op::Update).await;
        if let Some(length) = update.average_cycle_length {
            if !(MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&length) {
                return Err(StoreError::Invalid(format!(
                    "average cycle length must be between {MIN_CYCLE_LENGTH} and {MAX_CYCLE_LENGTH} days"
                )));
            }
        }
        if update.language.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(StoreError::Invalid("language cannot be empty".into()));
        }

        let mut settings = self.data.write().await;
        if let Some(v) = update.average_cycle_length {
            settings.average_cycle_length = v;
        }
        if let Some(v) = update.reminder_time {
            settings.reminder_time = v;
        }
        if let Some(v) = update.notifications_enabled {
            settings.notifications_enabled = v;
        }
        if let Some(v) = update.privacy_mode {
            settings.privacy_mode = v;
        }
        if let Some(v) = update.fertility_mode {
            settings.fertility_mode = v;
        }
        if let Some(v) = update.theme {
            settings.theme = v;
        }
        if let Some(v) = update.language {
            settings.language = v;
        }
        if let Some(v) = update.units {
            settings.units = v;
        }
        if let Some(v) = update.notifications {
            settings.notifications = v;
        }

        tracing::info!("settings updated");
        Ok(settings.clone())
    }

    pub async fn reset(&self) -> UserSettings {
        self.latency.wait(Op::Reset).await;
        let mut settings = self.data.write().await;
        *settings = UserSettings::default();
        tracing::info!("settings reset to defaults");
        settings.clone()
    }

    pub async fn profile(&self) -> Profile {
        self.latency.wait(Op::FetchOne).await;
        self.data.read().await.profile.clone()
    }

    pub async fn update_profile(&self, profile: Profile) -> Result<Profile, StoreError> {
        self.latency.wait(Op::Update).await;
        if !profile.email.is_empty() && !profile.email.contains('@') {
            return Err(StoreError::Invalid(format!("'{}' is not an email address", profile.email)));
        }
        let mut settings = self.data.write().await;
        settings.profile = profile;
        tracing::info!("profile updated");
        Ok(settings.profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Theme;
    use chrono::NaiveTime;

    fn store() -> SettingsStore {
        SettingsStore::new(UserSettings::default(), Latency::disabled())
    }

    #[tokio::test]
    async fn update_merges_and_reset_restores_defaults() {
        let store = store();
        let updated = store
            .update(SettingsUpdate {
                theme: Some(Theme::Green),
                fertility_mode: Some(true),
                reminder_time: NaiveTime::from_hms_opt(21, 30, 0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.theme, Theme::Green);
        assert!(updated.fertility_mode);
        assert_eq!(updated.average_cycle_length, 28);
        assert_eq!(store.get().await, updated);

        assert_eq!(store.reset().await, UserSettings::default());
    }

    #[tokio::test]
    async fn cycle_length_outside_bounds_is_rejected() {
        let store = store();
        for length in [19, 41] {
            let result = store
                .update(SettingsUpdate {
                    average_cycle_length: Some(length),
                    ..Default::default()
                })
                .await;
            assert!(matches!(result, Err(StoreError::Invalid(_))));
        }
        assert_eq!(store.get().await.average_cycle_length, 28);
    }

    #[tokio::test]
    async fn profile_round_trips_through_settings() {
        let store = store();
        let profile = Profile {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            ..Default::default()
        };
        store.update_profile(profile.clone()).await.unwrap();
        assert_eq!(store.profile().await, profile);
        assert_eq!(store.get().await.profile, profile);

        let bad = Profile {
            email: "nope".into(),
            ..Default::default()
        };
        assert!(store.update_profile(bad).await.is_err());
    }

    #[test]
    fn reminder_time_serializes_as_hours_and_minutes() {
        let json = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(json["reminder_time"], "09:00");
        assert_eq!(json["theme"], "purple");

        let back: UserSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, UserSettings::default());
    }
}
