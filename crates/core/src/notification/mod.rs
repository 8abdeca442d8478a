//! Notifications: records, user settings and routing.
//!
//! # Flow
//!
//! 1. A [`ChangeEvent`] arrives from the realtime feed.
//! 2. [`ChangeEvent::to_draft`] turns it into a [`NotificationDraft`], or
//!    nothing if the change is not worth telling anyone about.
//! 3. [`decide_effects`] evaluates the user's [`NotificationSettings`]
//!    against the notification type and the user's local time.
//! 4. The notification is prepended to the user's [`Inbox`].

pub mod event;
pub mod inbox;
pub mod quiet_hours;
pub mod record;
pub mod routing;
pub mod settings;

pub use event::{BookingRecord, BookingStatus, ChangeChannel, ChangeEvent, CustomerRecord};
pub use inbox::{DEFAULT_INBOX_CAPACITY, Inbox, InboxFilter};
pub use quiet_hours::{QuietHours, QuietHoursError};
pub use record::{Notification, NotificationDraft, NotificationPriority, NotificationType};
pub use routing::{Delivery, Effects, decide_effects};
pub use settings::{NotificationSettings, SettingsError, TypePreferences};
