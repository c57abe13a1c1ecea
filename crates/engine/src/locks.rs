//! Per-event serialization of read-then-write sequences.
//!
//! Join, leave and swap count or read participations and then write based on
//! what they read. Two of those running at once on the same event could both
//! see the last free seat. Each of them takes the event's lock before opening
//! its database transaction and holds it until commit.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct EventLocks {
    inner: DashMap<i32, Arc<Mutex<()>>>,
}

impl EventLocks {
    /// Wait for exclusive access to `event_id`. Different events never contend.
    pub(crate) async fn acquire(&self, event_id: i32) -> OwnedMutexGuard<()> {
        // Clone the Arc out so no map shard stays locked across the await.
        let lock = self.inner.entry(event_id).or_default().clone();
        lock.lock_owned().await
    }

    /// Drop locks nobody holds or waits for. Returns how many were removed.
    pub(crate) fn prune(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(self.inner.len())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}
