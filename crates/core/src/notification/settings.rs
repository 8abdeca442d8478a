//! Per-user notification settings.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::quiet_hours::QuietHours;
use super::record::NotificationType;

/// Largest UTC offset in use anywhere (UTC+14:00).
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Errors from validating [`NotificationSettings`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("sound volume must be between 0 and 100, got {0}")]
    VolumeOutOfRange(u8),
    #[error("UTC offset must be within ±840 minutes, got {0}")]
    OffsetOutOfRange(i32),
}

/// Per-type switches. A disabled type still lands in the inbox but raises
/// no toast, sound or desktop alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct TypePreferences {
    pub booking: bool,
    pub cancellation: bool,
    pub payment: bool,
    pub customer: bool,
    pub message: bool,
    pub staff: bool,
    pub system: bool,
}

impl Default for TypePreferences {
    fn default() -> Self {
        Self {
            booking: true,
            cancellation: true,
            payment: true,
            customer: true,
            message: true,
            staff: true,
            system: true,
        }
    }
}

impl TypePreferences {
    #[must_use]
    pub const fn allows(&self, kind: NotificationType) -> bool {
        match kind {
            NotificationType::Booking => self.booking,
            NotificationType::Cancellation => self.cancellation,
            NotificationType::Payment => self.payment,
            NotificationType::Customer => self.customer,
            NotificationType::Message => self.message,
            NotificationType::Staff => self.staff,
            NotificationType::System => self.system,
        }
    }
}

/// A user's notification preferences.
///
/// Missing fields deserialize to their defaults, so settings saved by an
/// older console keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct NotificationSettings {
    pub sound_enabled: bool,
    /// 0-100.
    pub sound_volume: u8,
    pub desktop_enabled: bool,
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub quiet_hours: QuietHours,
    pub types: TypePreferences,
    /// Offset of the user's clock from UTC, used to evaluate quiet hours.
    pub utc_offset_minutes: i32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            sound_volume: 70,
            desktop_enabled: false,
            email_enabled: true,
            sms_enabled: false,
            quiet_hours: QuietHours::default(),
            types: TypePreferences::default(),
            utc_offset_minutes: 0,
        }
    }
}

impl NotificationSettings {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if the volume exceeds 100 or the UTC offset is
    /// beyond ±14 hours.
    pub const fn validate(&self) -> Result<(), SettingsError> {
        if self.sound_volume > 100 {
            return Err(SettingsError::VolumeOutOfRange(self.sound_volume));
        }
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(SettingsError::OffsetOutOfRange(self.utc_offset_minutes));
        }
        Ok(())
    }

    /// The user's wall-clock time at `now`.
    #[must_use]
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveTime {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .map_or_else(|| now.time(), |offset| now.with_timezone(&offset).time())
    }

    /// Whether quiet hours are in effect at `now`.
    #[must_use]
    pub fn in_quiet_hours(&self, now: DateTime<Utc>) -> bool {
        self.quiet_hours.is_active(self.local_time(now))
    }
}
