//! Side-effect decisions for a new notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{Notification, NotificationType};
use super::settings::NotificationSettings;

/// Side effects the console should perform for one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effects {
    /// Show an in-app toast.
    pub toast: bool,
    /// Play the alert sound at this volume (0-100).
    pub sound: Option<u8>,
    /// Raise a desktop notification.
    pub desktop: bool,
}

impl Effects {
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        !self.toast && self.sound.is_none() && !self.desktop
    }
}

/// A notification together with the effects decided for its recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub notification: Notification,
    pub effects: Effects,
}

/// Decide toast, sound and desktop effects.
///
/// - The per-type switch gates all three.
/// - Quiet hours suppress sound and desktop, never the toast.
/// - Sound and desktop also need their global switches on.
#[must_use]
pub fn decide_effects(
    settings: &NotificationSettings,
    kind: NotificationType,
    now: DateTime<Utc>,
) -> Effects {
    if !settings.types.allows(kind) {
        return Effects::default();
    }

    let quiet = settings.in_quiet_hours(now);

    Effects {
        toast: true,
        sound: (settings.sound_enabled && !quiet).then_some(settings.sound_volume),
        desktop: settings.desktop_enabled && !quiet,
    }
}
