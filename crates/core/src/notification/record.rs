//! Notification records.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::NotificationId;

/// What a notification is about. Drives per-type routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Booking,
    Cancellation,
    Payment,
    Customer,
    Message,
    Staff,
    System,
}

impl NotificationType {
    pub const ALL: [Self; 7] = [
        Self::Booking,
        Self::Cancellation,
        Self::Payment,
        Self::Customer,
        Self::Message,
        Self::Staff,
        Self::System,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Cancellation => "cancellation",
            Self::Payment => "payment",
            Self::Customer => "customer",
            Self::Message => "message",
            Self::Staff => "staff",
            Self::System => "system",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A notification in a user's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    /// Creation time, serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// A notification before it has an id, timestamp or read state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl NotificationDraft {
    #[must_use]
    pub fn new(
        kind: NotificationType,
        priority: NotificationPriority,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            priority,
            title: title.into(),
            message: message.into(),
            action_url: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Add one metadata entry, creating the bag on first use.
    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.to_owned(), value.into());
        self
    }

    /// Stamp the draft with a fresh id and creation time. It starts unread.
    #[must_use]
    pub fn publish(self, at: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::new_v4(),
            kind: self.kind,
            priority: self.priority,
            title: self.title,
            message: self.message,
            timestamp: at,
            read: false,
            action_url: self.action_url,
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_starts_unread() {
        let now = Utc::now();
        let notification = NotificationDraft::new(
            NotificationType::System,
            NotificationPriority::Low,
            "Maintenance",
            "Scheduled maintenance tonight",
        )
        .publish(now);
        assert!(!notification.read);
        assert_eq!(notification.timestamp, now);
    }

    #[test]
    fn test_wire_shape() {
        let notification = NotificationDraft::new(
            NotificationType::Booking,
            NotificationPriority::High,
            "New booking",
            "Sam booked Vault Heist",
        )
        .with_action_url("/bookings/1")
        .with_metadata("partySize", 4)
        .publish(Utc::now());

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "booking");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["actionUrl"], "/bookings/1");
        assert_eq!(json["metadata"]["partySize"], 4);
        assert_eq!(json["read"], false);
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let notification =
            NotificationDraft::new(NotificationType::Staff, NotificationPriority::Low, "t", "m")
                .publish(Utc::now());
        let json = serde_json::to_value(&notification).unwrap();
        assert!(json.get("actionUrl").is_none());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_draft_priority_defaults_to_medium() {
        let draft: NotificationDraft =
            serde_json::from_str(r#"{"type":"message","title":"Hi","message":"there"}"#).unwrap();
        assert_eq!(draft.priority, NotificationPriority::Medium);
        assert_eq!(draft.action_url, None);
    }
}
