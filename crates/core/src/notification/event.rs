//! Change events from the realtime feed and how they become notifications.

use core::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::{NotificationDraft, NotificationPriority, NotificationType};
use crate::types::{BookingId, CustomerId, OrganizationId};

/// The independent realtime subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeChannel {
    /// New bookings.
    Bookings,
    /// Changes to existing bookings.
    BookingUpdates,
    /// New customers.
    Customers,
}

impl ChangeChannel {
    pub const ALL: [Self; 3] = [Self::Bookings, Self::BookingUpdates, Self::Customers];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bookings => "bookings",
            Self::BookingUpdates => "booking-updates",
            Self::Customers => "customers",
        }
    }
}

impl fmt::Display for ChangeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking lifecycle status.
///
/// Statuses this build does not know keep their raw value, so two different
/// unknown statuses never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
    Other(String),
}

impl BookingStatus {
    /// The wire value (`no_show` for no-shows).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::Other(status) => status,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "cancelled" => Self::Cancelled,
            "completed" => Self::Completed,
            "no_show" | "no-show" => Self::NoShow,
            _ => Self::Other(status),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Other(status) => status,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoShow => f.write_str("no-show"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A `bookings` row as published by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub organization_id: OrganizationId,
    pub customer_name: String,
    pub game_name: String,
    pub booking_date: NaiveDate,
    /// Wall-clock start, `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    #[serde(default = "default_party_size")]
    pub party_size: u32,
    pub status: BookingStatus,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

const fn default_party_size() -> u32 {
    1
}

impl BookingRecord {
    fn when(&self) -> String {
        let time = self.start_time.get(..5).unwrap_or(&self.start_time);
        format!("{} at {time}", self.booking_date.format("%b %-d, %Y"))
    }

    fn party(&self) -> String {
        if self.party_size == 1 {
            "1 player".to_owned()
        } else {
            format!("{} players", self.party_size)
        }
    }
}

/// A `customers` row as published by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub organization_id: OrganizationId,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A change delivered on one of the realtime channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    BookingCreated(BookingRecord),
    BookingUpdated {
        booking: BookingRecord,
        /// Status before the update, when the backend sent it.
        previous_status: Option<BookingStatus>,
    },
    CustomerCreated(CustomerRecord),
}

impl ChangeEvent {
    #[must_use]
    pub const fn channel(&self) -> ChangeChannel {
        match self {
            Self::BookingCreated(_) => ChangeChannel::Bookings,
            Self::BookingUpdated { .. } => ChangeChannel::BookingUpdates,
            Self::CustomerCreated(_) => ChangeChannel::Customers,
        }
    }

    #[must_use]
    pub const fn organization_id(&self) -> OrganizationId {
        match self {
            Self::BookingCreated(booking) | Self::BookingUpdated { booking, .. } => {
                booking.organization_id
            }
            Self::CustomerCreated(customer) => customer.organization_id,
        }
    }

    /// Build the notification for this change.
    ///
    /// A booking update whose status did not change yields `None`. An
    /// update without a previous status counts as a change.
    #[must_use]
    pub fn to_draft(&self) -> Option<NotificationDraft> {
        match self {
            Self::BookingCreated(booking) => Some(new_booking(booking)),
            Self::BookingUpdated {
                booking,
                previous_status,
            } => {
                if previous_status.as_ref() == Some(&booking.status) {
                    return None;
                }
                Some(status_change(booking, previous_status.as_ref()))
            }
            Self::CustomerCreated(customer) => Some(new_customer(customer)),
        }
    }
}

fn new_booking(booking: &BookingRecord) -> NotificationDraft {
    let mut draft = NotificationDraft::new(
        NotificationType::Booking,
        NotificationPriority::Medium,
        "New booking",
        format!(
            "{} booked {} on {} ({})",
            booking.customer_name,
            booking.game_name,
            booking.when(),
            booking.party()
        ),
    )
    .with_action_url(format!("/bookings/{}", booking.id))
    .with_metadata("bookingId", booking.id.to_string())
    .with_metadata("customerName", booking.customer_name.clone())
    .with_metadata("partySize", booking.party_size);

    if let Some(amount) = booking.total_amount {
        draft = draft.with_metadata("totalAmount", amount.to_string());
    }
    draft
}

fn status_change(booking: &BookingRecord, previous: Option<&BookingStatus>) -> NotificationDraft {
    let (kind, priority, title, message) = match &booking.status {
        BookingStatus::Cancelled => (
            NotificationType::Cancellation,
            NotificationPriority::High,
            "Booking cancelled",
            format!(
                "{}'s booking for {} on {} was cancelled",
                booking.customer_name,
                booking.game_name,
                booking.when()
            ),
        ),
        BookingStatus::Confirmed => (
            NotificationType::Booking,
            NotificationPriority::Low,
            "Booking confirmed",
            format!(
                "{}'s booking for {} on {} is confirmed",
                booking.customer_name,
                booking.game_name,
                booking.when()
            ),
        ),
        status => (
            NotificationType::Booking,
            NotificationPriority::Low,
            "Booking updated",
            match previous {
                Some(previous) => format!(
                    "{}'s booking for {} changed from {previous} to {status}",
                    booking.customer_name, booking.game_name
                ),
                None => format!(
                    "{}'s booking for {} is now {status}",
                    booking.customer_name, booking.game_name
                ),
            },
        ),
    };

    let mut draft = NotificationDraft::new(kind, priority, title, message)
        .with_action_url(format!("/bookings/{}", booking.id))
        .with_metadata("bookingId", booking.id.to_string())
        .with_metadata("status", booking.status.to_string());
    if let Some(previous) = previous {
        draft = draft.with_metadata("previousStatus", previous.to_string());
    }
    draft
}

fn new_customer(customer: &CustomerRecord) -> NotificationDraft {
    let message = match &customer.email {
        Some(email) => format!("{} ({email}) signed up", customer.full_name),
        None => format!("{} signed up", customer.full_name),
    };
    NotificationDraft::new(
        NotificationType::Customer,
        NotificationPriority::Low,
        "New customer",
        message,
    )
    .with_action_url(format!("/customers/{}", customer.id))
    .with_metadata("customerId", customer.id.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn booking(status: BookingStatus) -> BookingRecord {
        BookingRecord {
            id: BookingId::new_v4(),
            organization_id: OrganizationId::new_v4(),
            customer_name: "Riley Chen".to_owned(),
            game_name: "The Vault".to_owned(),
            booking_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            start_time: "19:30:00".to_owned(),
            party_size: 4,
            status,
            total_amount: Some(Decimal::new(12_000, 2)),
        }
    }

    #[test]
    fn test_new_booking() {
        let record = booking(BookingStatus::Pending);
        let draft = ChangeEvent::BookingCreated(record.clone()).to_draft().unwrap();
        assert_eq!(draft.kind, NotificationType::Booking);
        assert_eq!(draft.priority, NotificationPriority::Medium);
        assert_eq!(
            draft.message,
            "Riley Chen booked The Vault on Mar 14, 2026 at 19:30 (4 players)"
        );
        assert_eq!(
            draft.action_url.as_deref(),
            Some(format!("/bookings/{}", record.id).as_str())
        );
        assert_eq!(draft.metadata.unwrap()["totalAmount"], "120.00");
    }

    #[test]
    fn test_cancellation() {
        let event = ChangeEvent::BookingUpdated {
            booking: booking(BookingStatus::Cancelled),
            previous_status: Some(BookingStatus::Confirmed),
        };
        let draft = event.to_draft().unwrap();
        assert_eq!(draft.kind, NotificationType::Cancellation);
        assert_eq!(draft.priority, NotificationPriority::High);
        assert_eq!(draft.title, "Booking cancelled");
    }

    #[test]
    fn test_confirmation() {
        let event = ChangeEvent::BookingUpdated {
            booking: booking(BookingStatus::Confirmed),
            previous_status: Some(BookingStatus::Pending),
        };
        let draft = event.to_draft().unwrap();
        assert_eq!(draft.kind, NotificationType::Booking);
        assert_eq!(draft.title, "Booking confirmed");
    }

    #[test]
    fn test_other_status_change() {
        let event = ChangeEvent::BookingUpdated {
            booking: booking(BookingStatus::NoShow),
            previous_status: Some(BookingStatus::Confirmed),
        };
        let draft = event.to_draft().unwrap();
        assert_eq!(draft.title, "Booking updated");
        assert!(draft.message.contains("from confirmed to no-show"));
    }

    #[test]
    fn test_unchanged_status_is_ignored() {
        let event = ChangeEvent::BookingUpdated {
            booking: booking(BookingStatus::Confirmed),
            previous_status: Some(BookingStatus::Confirmed),
        };
        assert!(event.to_draft().is_none());
    }

    #[test]
    fn test_missing_previous_status_counts_as_change() {
        let event = ChangeEvent::BookingUpdated {
            booking: booking(BookingStatus::Completed),
            previous_status: None,
        };
        let draft = event.to_draft().unwrap();
        assert!(draft.message.ends_with("is now completed"));
    }

    #[test]
    fn test_new_customer() {
        let customer = CustomerRecord {
            id: CustomerId::new_v4(),
            organization_id: OrganizationId::new_v4(),
            full_name: "Ada Park".to_owned(),
            email: Some("ada@example.com".to_owned()),
        };
        let event = ChangeEvent::CustomerCreated(customer.clone());
        assert_eq!(event.channel(), ChangeChannel::Customers);
        assert_eq!(event.organization_id(), customer.organization_id);

        let draft = event.to_draft().unwrap();
        assert_eq!(draft.kind, NotificationType::Customer);
        assert_eq!(draft.message, "Ada Park (ada@example.com) signed up");
    }

    #[test]
    fn test_unknown_status_keeps_raw_value() {
        let status: BookingStatus = serde_json::from_str("\"waitlisted\"").unwrap();
        assert_eq!(status, BookingStatus::Other("waitlisted".to_owned()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"waitlisted\"");

        let no_show: BookingStatus = serde_json::from_str("\"no-show\"").unwrap();
        assert_eq!(no_show, BookingStatus::NoShow);
        assert_eq!(serde_json::to_string(&no_show).unwrap(), "\"no_show\"");
    }

    #[test]
    fn test_change_between_unknown_statuses() {
        let event = ChangeEvent::BookingUpdated {
            booking: booking(BookingStatus::Other("rescheduled".to_owned())),
            previous_status: Some(BookingStatus::Other("waitlisted".to_owned())),
        };
        let draft = event.to_draft().unwrap();
        assert_eq!(draft.title, "Booking updated");
        assert!(draft.message.ends_with("changed from waitlisted to rescheduled"));

        let unchanged = ChangeEvent::BookingUpdated {
            booking: booking(BookingStatus::Other("waitlisted".to_owned())),
            previous_status: Some(BookingStatus::Other("waitlisted".to_owned())),
        };
        assert!(unchanged.to_draft().is_none());
    }

    #[test]
    fn test_single_player() {
        let mut record = booking(BookingStatus::Pending);
        record.party_size = 1;
        let draft = ChangeEvent::BookingCreated(record).to_draft().unwrap();
        assert!(draft.message.ends_with("(1 player)"));
    }
}
