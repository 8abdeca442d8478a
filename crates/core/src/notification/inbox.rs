//! A user's notification list, most recent first.

use std::collections::VecDeque;

use serde::Deserialize;

use super::record::{Notification, NotificationType};
use crate::types::NotificationId;

/// Inbox size used when nothing else is configured.
pub const DEFAULT_INBOX_CAPACITY: usize = 200;

/// Filter for listing notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct InboxFilter {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default, rename = "type")]
    pub kind: Option<NotificationType>,
}

impl InboxFilter {
    fn matches(&self, notification: &Notification) -> bool {
        (!self.unread_only || !notification.read)
            && self.kind.is_none_or(|kind| notification.kind == kind)
    }
}

/// Ordered notification list with a retention cap.
///
/// The newest entry is always first. When a push exceeds the capacity the
/// oldest entry is dropped.
#[derive(Debug, Clone)]
pub struct Inbox {
    entries: VecDeque<Notification>,
    capacity: usize,
}

impl Default for Inbox {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INBOX_CAPACITY)
    }
}

impl Inbox {
    /// Create an empty inbox. A capacity of zero is treated as one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Prepend a notification, returning the entry evicted to stay within
    /// capacity, if any.
    pub fn push(&mut self, notification: Notification) -> Option<Notification> {
        self.entries.push_front(notification);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    /// All entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Entries matching `filter`, newest first.
    #[must_use]
    pub fn list(&self, filter: InboxFilter) -> Vec<Notification> {
        self.entries
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect()
    }

    /// Mark one entry read. Returns `false` if no entry has that id.
    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark every entry read. Returns how many were unread.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.entries.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    /// Remove exactly the entry with `id`.
    pub fn delete(&mut self, id: NotificationId) -> Option<Notification> {
        let index = self.entries.iter().position(|n| n.id == id)?;
        self.entries.remove(index)
    }

    /// Remove everything. Returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
