//! Live query bookkeeping shared by the store implementations

use super::subscription::{SnapshotEvent, SnapshotSender, Subscription};
use super::traits::CollectionSpec;
use crate::domain::Snapshot;
use crate::error::StoreError;

struct Subscriber {
    id: u64,
    spec: CollectionSpec,
    tx: SnapshotSender,
}

/// Open live queries of one store
#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl SubscriberRegistry {
    /// Register a live query and deliver its first snapshot.
    ///
    /// `release` receives the subscriber id and must call [`Self::remove`].
    pub fn register(
        &mut self,
        spec: &CollectionSpec,
        initial: Snapshot,
        release: impl FnOnce(u64) + Send + 'static,
    ) -> Subscription {
        self.next_id += 1;
        let id = self.next_id;
        let (tx, subscription) = Subscription::channel(move || release(id));
        if tx.send(Ok(initial)).is_ok() {
            self.subscribers.push(Subscriber {
                id,
                spec: spec.clone(),
                tx,
            });
        }
        subscription
    }

    pub fn remove(&mut self, id: u64) {
        self.subscribers.retain(|s| s.id != id);
    }

    /// Push a fresh snapshot to every live query on `collection`.
    ///
    /// Subscribers whose receiving side is gone are dropped.
    pub fn notify(&mut self, collection: &str, mut snapshot_for: impl FnMut(&CollectionSpec) -> SnapshotEvent) {
        self.subscribers.retain(|s| {
            if s.spec.name != collection {
                return true;
            }
            s.tx.send(snapshot_for(&s.spec)).is_ok()
        });
    }

    /// Deliver `err` to every live query on `collection` and end them
    pub fn fail(&mut self, collection: &str, err: &StoreError) {
        self.subscribers.retain(|s| {
            if s.spec.name != collection {
                return true;
            }
            let _ = s.tx.send(Err(err.clone()));
            false
        });
    }

    pub fn count(&self, collection: &str) -> usize {
        self.subscribers.iter().filter(|s| s.spec.name == collection).count()
    }
}
