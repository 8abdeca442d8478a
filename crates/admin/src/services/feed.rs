//! In-process realtime change feed.
//!
//! Verified webhook events are published once and fanned out to one task per
//! subscribed channel (`bookings`, `booking-updates`, `customers`). Tasks do
//! not share ordering: an update may be handled before the insert it follows
//! if both arrive close together.
//!
//! There is no reconnection. When the feed closes, subscription tasks end and
//! notifications simply stop.

use std::future::Future;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use venuedesk_core::notification::{ChangeChannel, ChangeEvent};

/// Events buffered per subscriber before it starts lagging.
const FEED_CAPACITY: usize = 256;

/// Broadcast fan-out of change events.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Publish an event. Returns how many subscription tasks will see it.
    ///
    /// Publishing with no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let channel = event.channel();
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!(%channel, "No feed subscribers, dropping change event");
                0
            }
        }
    }

    /// Run `handler` for every event on `channel` in its own task.
    ///
    /// The task is aborted when the returned [`Subscription`] is dropped.
    /// Lagged events are logged and skipped.
    #[must_use = "dropping the subscription stops it"]
    pub fn subscribe<F, Fut>(&self, channel: ChangeChannel, handler: F) -> Subscription
    where
        F: Fn(ChangeEvent) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut receiver = self.sender.subscribe();

        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if event.channel() == channel => handler(event).await,
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%channel, skipped, "Change feed subscriber lagged");
                    }
                    Err(RecvError::Closed) => {
                        debug!(%channel, "Change feed closed");
                        break;
                    }
                }
            }
        });

        Subscription { channel, task }
    }
}

/// Handle to a running channel subscription.
#[derive(Debug)]
pub struct Subscription {
    channel: ChangeChannel,
    task: JoinHandle<()>,
}

impl Subscription {
    #[must_use]
    pub const fn channel(&self) -> ChangeChannel {
        self.channel
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
