//! Notification center: per-user inboxes and live deliveries.
//!
//! Users attach by calling any notification endpoint. From then on, change
//! events for their organization are turned into notifications, prepended to
//! their inbox and pushed to their live stream with the effects their
//! settings allow.
//!
//! Inboxes live in process memory behind one `RwLock`; every mutation takes
//! the write lock, so each inbox has a single writer at a time. Members with
//! no open stream that have not called in for [`IDLE_MEMBER_TTL_SECS`] are
//! dropped, inbox included, whenever a new member attaches.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, instrument};

use venuedesk_core::access::catalog::NOTIFICATIONS_VIEW;
use venuedesk_core::notification::{
    ChangeChannel, ChangeEvent, Delivery, Inbox, InboxFilter, Notification, NotificationDraft,
    NotificationSettings, decide_effects,
};
use venuedesk_core::{NotificationId, OrganizationId, UserId, access};

use super::feed::{ChangeFeed, Subscription};
use super::settings::SettingsStore;
use crate::models::CurrentUser;

/// Deliveries buffered per live stream.
const STREAM_CAPACITY: usize = 64;

/// How long a member without a live stream is kept after their last request.
pub const IDLE_MEMBER_TTL_SECS: i64 = 24 * 60 * 60;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

struct Member {
    organization_id: Option<OrganizationId>,
    role: String,
    inbox: Inbox,
    deliveries: broadcast::Sender<Delivery>,
    last_seen: DateTime<Utc>,
}

impl Member {
    fn new(user: &CurrentUser, capacity: usize, now: DateTime<Utc>) -> Self {
        let (deliveries, _) = broadcast::channel(STREAM_CAPACITY);
        Self {
            organization_id: user.organization_id,
            role: user.role.clone(),
            inbox: Inbox::with_capacity(capacity),
            deliveries,
            last_seen: now,
        }
    }

    fn is_idle(&self, now: DateTime<Utc>) -> bool {
        self.deliveries.receiver_count() == 0
            && now.signed_duration_since(self.last_seen) > TimeDelta::seconds(IDLE_MEMBER_TTL_SECS)
    }

    fn receives(&self, organization_id: OrganizationId) -> bool {
        self.organization_id == Some(organization_id)
            && access::has_permission(&self.role, NOTIFICATIONS_VIEW)
    }

    fn deliver(
        &mut self,
        notification: Notification,
        settings: &NotificationSettings,
        now: DateTime<Utc>,
    ) -> Delivery {
        let effects = decide_effects(settings, notification.kind, now);
        if effects.is_silent() {
            debug!(notification_id = %notification.id, kind = %notification.kind, "Delivering without effects");
        }
        if let Some(evicted) = self.inbox.push(notification.clone()) {
            debug!(notification_id = %evicted.id, "Inbox full, dropped oldest notification");
        }

        let delivery = Delivery {
            notification,
            effects,
        };
        // No live stream is not an error.
        let _ = self.deliveries.send(delivery.clone());
        delivery
    }
}

/// In-memory notification center shared by handlers and feed subscriptions.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<NotificationCenterInner>,
}

struct NotificationCenterInner {
    members: RwLock<HashMap<UserId, Member>>,
    settings: SettingsStore,
    clock: Arc<dyn Clock>,
    inbox_capacity: usize,
}

impl NotificationCenter {
    #[must_use]
    pub fn with_clock(
        settings: SettingsStore,
        inbox_capacity: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(NotificationCenterInner {
                members: RwLock::new(HashMap::new()),
                settings,
                clock,
                inbox_capacity,
            }),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }

    /// Subscribe the center to all three change channels.
    ///
    /// Each channel runs in its own task; dropping a handle stops that channel.
    #[must_use = "dropping the subscriptions stops notification routing"]
    pub fn listen(&self, feed: &ChangeFeed) -> Vec<Subscription> {
        ChangeChannel::ALL
            .into_iter()
            .map(|channel| {
                let center = self.clone();
                feed.subscribe(channel, move |event| {
                    let center = center.clone();
                    async move {
                        center.route(&event).await;
                    }
                })
            })
            .collect()
    }

    /// Register the caller as a recipient, refreshing role and organization.
    pub async fn attach(&self, user: &CurrentUser) {
        let now = self.inner.clock.now();
        let mut members = self.inner.members.write().await;
        if let Some(member) = members.get_mut(&user.id) {
            member.organization_id = user.organization_id;
            member.role.clone_from(&user.role);
            member.last_seen = now;
            return;
        }

        let before = members.len();
        members.retain(|_, member| !member.is_idle(now));
        let evicted = before - members.len();
        if evicted > 0 {
            debug!(evicted, "Dropped idle notification members");
        }
        members.insert(user.id, Member::new(user, self.inner.inbox_capacity, now));
    }

    #[cfg(test)]
    async fn member_count(&self) -> usize {
        self.inner.members.read().await.len()
    }

    /// Turn a change event into notifications for its organization.
    ///
    /// Returns the number of users it was delivered to.
    #[instrument(
        skip(self, event),
        fields(channel = %event.channel(), organization_id = %event.organization_id())
    )]
    pub async fn route(&self, event: &ChangeEvent) -> usize {
        let Some(draft) = event.to_draft() else {
            debug!("Change produced no notification");
            return 0;
        };
        let organization_id = event.organization_id();

        let recipients: Vec<UserId> = self
            .inner
            .members
            .read()
            .await
            .iter()
            .filter(|(_, member)| member.receives(organization_id))
            .map(|(id, _)| *id)
            .collect();

        if recipients.is_empty() {
            debug!("No attached recipients");
            return 0;
        }

        let mut settings = Vec::with_capacity(recipients.len());
        for user_id in recipients {
            settings.push((user_id, self.inner.settings.get_or_default(user_id).await));
        }

        let now = self.inner.clock.now();
        let notification = draft.publish(now);

        let mut members = self.inner.members.write().await;
        let mut delivered = 0;
        for (user_id, settings) in &settings {
            if let Some(member) = members.get_mut(user_id) {
                member.deliver(notification.clone(), settings, now);
                delivered += 1;
            }
        }

        tracing::info!(
            notification_id = %notification.id,
            kind = %notification.kind,
            delivered,
            "Routed change notification"
        );
        delivered
    }

    /// Create a notification for the caller only.
    pub async fn notify(&self, user: &CurrentUser, draft: NotificationDraft) -> Delivery {
        self.attach(user).await;
        let settings = self.inner.settings.get_or_default(user.id).await;
        let now = self.inner.clock.now();
        let notification = draft.publish(now);

        let mut members = self.inner.members.write().await;
        let member = members
            .entry(user.id)
            .or_insert_with(|| Member::new(user, self.inner.inbox_capacity, now));
        member.deliver(notification, &settings, now)
    }

    /// Live deliveries for the caller.
    pub async fn stream(&self, user: &CurrentUser) -> broadcast::Receiver<Delivery> {
        self.attach(user).await;
        let members = self.inner.members.read().await;
        match members.get(&user.id) {
            Some(member) => member.deliveries.subscribe(),
            // attach() just inserted it; a closed receiver ends the stream quietly.
            None => broadcast::channel(1).1,
        }
    }

    /// The caller's notifications matching `filter`, plus their unread count.
    pub async fn list(&self, user_id: UserId, filter: InboxFilter) -> (Vec<Notification>, usize) {
        let members = self.inner.members.read().await;
        members
            .get(&user_id)
            .map(|member| (member.inbox.list(filter), member.inbox.unread_count()))
            .unwrap_or_default()
    }

    pub async fn unread_count(&self, user_id: UserId) -> usize {
        let members = self.inner.members.read().await;
        members
            .get(&user_id)
            .map_or(0, |member| member.inbox.unread_count())
    }

    /// Mark one notification read. Returns `false` if it is not in the inbox.
    pub async fn mark_read(&self, user_id: UserId, id: NotificationId) -> bool {
        self.with_inbox(user_id, |inbox| inbox.mark_read(id))
            .await
            .unwrap_or(false)
    }

    /// Mark everything read. Returns how many were unread.
    pub async fn mark_all_read(&self, user_id: UserId) -> usize {
        self.with_inbox(user_id, Inbox::mark_all_read)
            .await
            .unwrap_or(0)
    }

    /// Delete one notification, returning it.
    pub async fn delete(&self, user_id: UserId, id: NotificationId) -> Option<Notification> {
        self.with_inbox(user_id, |inbox| inbox.delete(id))
            .await
            .flatten()
    }

    /// Empty the inbox. Returns how many were removed.
    pub async fn clear(&self, user_id: UserId) -> usize {
        self.with_inbox(user_id, Inbox::clear).await.unwrap_or(0)
    }

    async fn with_inbox<T>(
        &self,
        user_id: UserId,
        f: impl FnOnce(&mut Inbox) -> T,
    ) -> Option<T> {
        let mut members = self.inner.members.write().await;
        members.get_mut(&user_id).map(|member| f(&mut member.inbox))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use venuedesk_core::notification::{
        BookingRecord, BookingStatus, NotificationPriority, NotificationType, QuietHours,
    };
    use venuedesk_core::BookingId;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    fn center_at(now: DateTime<Utc>, capacity: usize) -> NotificationCenter {
        NotificationCenter::with_clock(SettingsStore::memory(), capacity, Arc::new(FixedClock(now)))
    }

    fn member(role: &str, org: OrganizationId) -> CurrentUser {
        CurrentUser {
            id: UserId::new_v4(),
            email: None,
            role: role.to_string(),
            plan: Some("growth".to_string()),
            organization_id: Some(org),
        }
    }

    fn new_booking(org: OrganizationId) -> ChangeEvent {
        ChangeEvent::BookingCreated(BookingRecord {
            id: BookingId::new_v4(),
            organization_id: org,
            customer_name: "Riley Chen".to_string(),
            game_name: "The Vault".to_string(),
            booking_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            start_time: "19:30".to_string(),
            party_size: 4,
            status: BookingStatus::Pending,
            total_amount: None,
        })
    }

    fn draft(title: &str) -> NotificationDraft {
        NotificationDraft::new(NotificationType::System, NotificationPriority::Low, title, "body")
    }

    #[tokio::test]
    async fn test_route_reaches_org_members_with_permission() {
        let org = OrganizationId::new_v4();
        let center = center_at(at(12, 0), 200);
        let staff = member("staff", org);
        let outsider = member("admin", OrganizationId::new_v4());
        let unknown_role = member("owner", org);
        for user in [&staff, &outsider, &unknown_role] {
            center.attach(user).await;
        }

        assert_eq!(center.route(&new_booking(org)).await, 1);

        let (items, unread) = center.list(staff.id, InboxFilter::default()).await;
        assert_eq!(items.len(), 1);
        assert_eq!(unread, 1);
        assert_eq!(items[0].title, "New booking");
        assert_eq!(center.unread_count(outsider.id).await, 0);
        assert_eq!(center.unread_count(unknown_role.id).await, 0);
    }

    struct SteppedClock(std::sync::Mutex<DateTime<Utc>>);

    impl SteppedClock {
        fn advance(&self, by: TimeDelta) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for SteppedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    #[tokio::test]
    async fn test_idle_members_are_dropped() {
        let org = OrganizationId::new_v4();
        let clock = Arc::new(SteppedClock(std::sync::Mutex::new(at(9, 0))));
        let center = NotificationCenter::with_clock(SettingsStore::memory(), 200, clock.clone());

        let idle = member("staff", org);
        let streaming = member("staff", org);
        let returning = member("staff", org);
        center.attach(&idle).await;
        center.attach(&returning).await;
        let _live = center.stream(&streaming).await;
        assert_eq!(center.member_count().await, 3);

        clock.advance(TimeDelta::seconds(IDLE_MEMBER_TTL_SECS - 60));
        center.attach(&returning).await;
        clock.advance(TimeDelta::seconds(120));

        center.attach(&member("staff", org)).await;
        assert_eq!(center.member_count().await, 3);
        assert_eq!(center.unread_count(idle.id).await, 0);

        let ids: Vec<UserId> = center.inner.members.read().await.keys().copied().collect();
        assert!(!ids.contains(&idle.id));
        assert!(ids.contains(&streaming.id));
        assert!(ids.contains(&returning.id));
    }

    #[tokio::test]
    async fn test_unchanged_status_routes_nothing() {
        let org = OrganizationId::new_v4();
        let center = center_at(at(12, 0), 200);
        let staff = member("staff", org);
        center.attach(&staff).await;

        let ChangeEvent::BookingCreated(booking) = new_booking(org) else {
            unreachable!()
        };
        let event = ChangeEvent::BookingUpdated {
            previous_status: Some(booking.status.clone()),
            booking,
        };

        assert_eq!(center.route(&event).await, 0);
        assert_eq!(center.unread_count(staff.id).await, 0);
    }

    #[tokio::test]
    async fn test_quiet_hours_keep_toast_only() {
        let org = OrganizationId::new_v4();
        let center = center_at(at(23, 30), 200);
        let staff = member("staff", org);
        center
            .settings()
            .put(
                staff.id,
                NotificationSettings {
                    desktop_enabled: true,
                    quiet_hours: QuietHours {
                        enabled: true,
                        ..QuietHours::default()
                    },
                    ..NotificationSettings::default()
                },
            )
            .await
            .unwrap();

        let mut stream = center.stream(&staff).await;
        center.route(&new_booking(org)).await;

        let delivery = stream.recv().await.unwrap();
        assert!(delivery.effects.toast);
        assert_eq!(delivery.effects.sound, None);
        assert!(!delivery.effects.desktop);
    }

    #[tokio::test]
    async fn test_notify_applies_settings() {
        let center = center_at(at(12, 0), 200);
        let user = member("manager", OrganizationId::new_v4());

        let delivery = center.notify(&user, draft("Heads up")).await;
        assert!(delivery.effects.toast);
        assert_eq!(delivery.effects.sound, Some(70));
        assert!(!delivery.effects.desktop);
        assert_eq!(center.unread_count(user.id).await, 1);
    }

    #[tokio::test]
    async fn test_inbox_mutations() {
        let center = center_at(at(12, 0), 200);
        let user = member("staff", OrganizationId::new_v4());
        let first = center.notify(&user, draft("one")).await.notification;
        let second = center.notify(&user, draft("two")).await.notification;
        let third = center.notify(&user, draft("three")).await.notification;

        assert!(center.mark_read(user.id, second.id).await);
        assert!(!center.mark_read(user.id, NotificationId::new_v4()).await);
        assert_eq!(center.unread_count(user.id).await, 2);

        let deleted = center.delete(user.id, first.id).await.unwrap();
        assert_eq!(deleted.id, first.id);
        assert!(center.delete(user.id, first.id).await.is_none());

        assert_eq!(center.mark_all_read(user.id).await, 1);
        let (items, unread) = center.list(user.id, InboxFilter::default()).await;
        assert_eq!(unread, 0);
        let ids: Vec<_> = items.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![third.id, second.id]);

        assert_eq!(center.clear(user.id).await, 2);
        assert_eq!(center.list(user.id, InboxFilter::default()).await.0.len(), 0);
    }

    #[tokio::test]
    async fn test_inbox_capacity_drops_oldest() {
        let center = center_at(at(12, 0), 2);
        let user = member("staff", OrganizationId::new_v4());
        center.notify(&user, draft("one")).await;
        center.notify(&user, draft("two")).await;
        center.notify(&user, draft("three")).await;

        let (items, _) = center.list(user.id, InboxFilter::default()).await;
        let titles: Vec<_> = items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "two"]);
    }

    #[tokio::test]
    async fn test_listen_routes_published_events() {
        let org = OrganizationId::new_v4();
        let center = center_at(at(12, 0), 200);
        let feed = ChangeFeed::new();
        let _subscriptions = center.listen(&feed);
        let staff = member("staff", org);
        let mut stream = center.stream(&staff).await;

        assert_eq!(feed.publish(new_booking(org)), 3);

        let delivery = tokio::time::timeout(std::time::Duration::from_secs(1), stream.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delivery.notification.kind, NotificationType::Booking);
    }
}
