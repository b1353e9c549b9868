//! Platform-wide switches an administrator can flip.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::workflows::notifications::{NotificationDraft, NotificationPublisher, NotifyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub maintenance_mode: bool,
    pub user_registration: bool,
    pub job_posting: bool,
    pub auto_approval: bool,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            sms_notifications: false,
            maintenance_mode: false,
            user_registration: true,
            job_posting: true,
            auto_approval: false,
        }
    }
}

impl PlatformSettings {
    pub fn get(&self, key: SettingKey) -> bool {
        *self.slot(key)
    }

    fn slot(&self, key: SettingKey) -> &bool {
        match key {
            SettingKey::EmailNotifications => &self.email_notifications,
            SettingKey::SmsNotifications => &self.sms_notifications,
            SettingKey::MaintenanceMode => &self.maintenance_mode,
            SettingKey::UserRegistration => &self.user_registration,
            SettingKey::JobPosting => &self.job_posting,
            SettingKey::AutoApproval => &self.auto_approval,
        }
    }

    fn slot_mut(&mut self, key: SettingKey) -> &mut bool {
        match key {
            SettingKey::EmailNotifications => &mut self.email_notifications,
            SettingKey::SmsNotifications => &mut self.sms_notifications,
            SettingKey::MaintenanceMode => &mut self.maintenance_mode,
            SettingKey::UserRegistration => &mut self.user_registration,
            SettingKey::JobPosting => &mut self.job_posting,
            SettingKey::AutoApproval => &mut self.auto_approval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    EmailNotifications,
    SmsNotifications,
    MaintenanceMode,
    UserRegistration,
    JobPosting,
    AutoApproval,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        Self::EmailNotifications,
        Self::SmsNotifications,
        Self::MaintenanceMode,
        Self::UserRegistration,
        Self::JobPosting,
        Self::AutoApproval,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmailNotifications => "email_notifications",
            Self::SmsNotifications => "sms_notifications",
            Self::MaintenanceMode => "maintenance_mode",
            Self::UserRegistration => "user_registration",
            Self::JobPosting => "job_posting",
            Self::AutoApproval => "auto_approval",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EmailNotifications => "Email Notifications",
            Self::SmsNotifications => "SMS Notifications",
            Self::MaintenanceMode => "Maintenance Mode",
            Self::UserRegistration => "User Registration",
            Self::JobPosting => "Job Posting",
            Self::AutoApproval => "Auto Approval",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| SettingsError::UnknownKey(value.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown setting `{0}`")]
    UnknownKey(String),
    #[error("settings unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

pub struct SettingsService<N> {
    settings: Mutex<PlatformSettings>,
    notifications: Arc<N>,
}

impl<N> SettingsService<N>
where
    N: NotificationPublisher + 'static,
{
    pub fn new(notifications: Arc<N>) -> Self {
        Self::with_settings(PlatformSettings::default(), notifications)
    }

    pub fn with_settings(settings: PlatformSettings, notifications: Arc<N>) -> Self {
        Self {
            settings: Mutex::new(settings),
            notifications,
        }
    }

    fn settings(&self) -> Result<MutexGuard<'_, PlatformSettings>, SettingsError> {
        self.settings
            .lock()
            .map_err(|_| SettingsError::Unavailable("settings mutex poisoned".to_string()))
    }

    pub fn snapshot(&self) -> Result<PlatformSettings, SettingsError> {
        Ok(*self.settings()?)
    }

    /// Writes one switch and announces the new value, even when it did not change.
    pub fn set(&self, key: SettingKey, enabled: bool) -> Result<PlatformSettings, SettingsError> {
        self.update(key, |_| enabled)
    }

    pub fn toggle(&self, key: SettingKey) -> Result<PlatformSettings, SettingsError> {
        self.update(key, |current| !current)
    }

    /// Reads and writes the switch under one guard so concurrent toggles never cancel out.
    fn update(
        &self,
        key: SettingKey,
        next: impl FnOnce(bool) -> bool,
    ) -> Result<PlatformSettings, SettingsError> {
        let (snapshot, enabled) = {
            let mut settings = self.settings()?;
            let slot = settings.slot_mut(key);
            *slot = next(*slot);
            let enabled = *slot;
            (*settings, enabled)
        };

        let state = if enabled { "enabled" } else { "disabled" };
        self.notifications.publish(NotificationDraft::info(
            "Setting Updated",
            format!("{} has been {state}.", key.label()),
        ))?;
        info!(setting = %key, enabled, "platform setting updated");
        Ok(snapshot)
    }

    pub fn save(&self) -> Result<PlatformSettings, SettingsError> {
        let snapshot = self.snapshot()?;
        self.notifications.publish(NotificationDraft::success(
            "Settings Saved",
            "System settings have been updated successfully.",
        ))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::notifications::NotificationCenter;

    fn service() -> (SettingsService<NotificationCenter>, Arc<NotificationCenter>) {
        let center = Arc::new(NotificationCenter::new());
        (SettingsService::new(center.clone()), center)
    }

    #[test]
    fn toggle_flips_only_the_named_switch() {
        for key in SettingKey::ALL {
            let (service, _) = service();
            let before = service.snapshot().expect("snapshot");

            let after = service.toggle(key).expect("toggle");

            assert_eq!(after.get(key), !before.get(key));
            for other in SettingKey::ALL.into_iter().filter(|other| *other != key) {
                assert_eq!(after.get(other), before.get(other), "{other} changed");
            }
        }
    }

    #[test]
    fn enabling_maintenance_mode_is_announced() {
        let (service, center) = service();

        service
            .set(SettingKey::MaintenanceMode, true)
            .expect("set");

        let latest = center.latest().expect("latest").expect("notification");
        assert_eq!(latest.title, "Setting Updated");
        assert_eq!(latest.message, "Maintenance Mode has been enabled.");
        assert!(service.snapshot().expect("snapshot").maintenance_mode);
    }

    #[test]
    fn keys_parse_from_path_segments() {
        assert_eq!(
            "auto-approval".parse::<SettingKey>().expect("parse"),
            SettingKey::AutoApproval
        );
        assert_eq!(
            "sms_notifications".parse::<SettingKey>().expect("parse"),
            SettingKey::SmsNotifications
        );
        assert!(matches!(
            "dark_mode".parse::<SettingKey>(),
            Err(SettingsError::UnknownKey(key)) if key == "dark_mode"
        ));
    }

    #[test]
    fn save_reports_current_snapshot() {
        let (service, center) = service();
        service.toggle(SettingKey::JobPosting).expect("toggle");

        let saved = service.save().expect("save");

        assert!(!saved.job_posting);
        assert_eq!(
            center.latest().expect("latest").expect("notification").title,
            "Settings Saved"
        );
    }

    #[test]
    fn concurrent_toggles_all_land() {
        let (service, center) = service();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        service.toggle(SettingKey::MaintenanceMode).expect("toggle");
                    }
                });
            }
        });
        service.toggle(SettingKey::MaintenanceMode).expect("toggle");

        assert!(service.snapshot().expect("snapshot").maintenance_mode);
        assert_eq!(
            center.latest().expect("latest").expect("notification").message,
            "Maintenance Mode has been enabled."
        );
    }
}
