//! Live subscriptions
//!
//! A subscription is an ordered stream of snapshot events plus a handle that
//! stops delivery when released or dropped.

use std::fmt;

use tokio::sync::mpsc;

use crate::domain::Snapshot;
use crate::error::StoreError;

/// One delivery on a live stream
pub type SnapshotEvent = Result<Snapshot, StoreError>;

/// Sending half kept by a store for each live query
pub type SnapshotSender = mpsc::UnboundedSender<SnapshotEvent>;

/// Stops delivery for one subscription. Releasing twice is a no-op.
pub struct SubscriptionHandle {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionHandle {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Receiving half of a live query
#[derive(Debug)]
pub struct SnapshotStream {
    events: mpsc::UnboundedReceiver<SnapshotEvent>,
}

impl SnapshotStream {
    /// Next event, or `None` once the store stops delivering
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.events.recv().await
    }
}

/// A live query: events in emission order plus the handle that ends them
#[derive(Debug)]
pub struct Subscription {
    stream: SnapshotStream,
    handle: SubscriptionHandle,
}

impl Subscription {
    /// Create the channel a store feeds; `release` runs when the handle is released
    pub fn channel(release: impl FnOnce() + Send + 'static) -> (SnapshotSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = Self {
            stream: SnapshotStream { events: rx },
            handle: SubscriptionHandle::new(release),
        };
        (tx, subscription)
    }

    /// A subscription that reports `err` once and ends
    pub fn failed(err: StoreError) -> Self {
        let (tx, subscription) = Self::channel(|| {});
        let _ = tx.send(Err(err));
        subscription
    }

    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.stream.next().await
    }

    pub fn split(self) -> (SnapshotStream, SubscriptionHandle) {
        (self.stream, self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_handle_releases_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let handle = SubscriptionHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handle.release();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handle_releases_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        {
            let _handle = SubscriptionHandle::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_subscription_reports_then_ends() {
        let mut sub = Subscription::failed(StoreError::PermissionDenied("tags".into()));
        assert!(matches!(sub.next().await, Some(Err(StoreError::PermissionDenied(_)))));
        assert!(sub.next().await.is_none());
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (tx, mut sub) = Subscription::channel(|| {});
        tx.send(Ok(Vec::new())).unwrap();
        tx.send(Err(StoreError::Unavailable("offline".into()))).unwrap();
        drop(tx);

        assert!(matches!(sub.next().await, Some(Ok(_))));
        assert!(matches!(sub.next().await, Some(Err(_))));
        assert!(sub.next().await.is_none());
    }
}
