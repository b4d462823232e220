//! Interval poller and snapshot store
//!
//! The poller runs one cycle immediately and then one per interval. Every
//! cycle runs in its own task and carries a sequence number taken when it
//! starts, so a slow cycle can finish after a newer one. The store only ever
//! moves forward: a snapshot older than the one it holds is dropped.
//! Readers get an `Arc<Snapshot>` and never observe a partial update.

use crate::aggregator::Aggregator;
use crate::report::Snapshot;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Holder of the most recent published snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Option<Arc<Snapshot>>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot if `snapshot` is newer. Returns whether it
    /// was applied.
    pub async fn publish(&self, snapshot: Arc<Snapshot>) -> bool {
        let mut current = self.inner.write().await;
        if let Some(held) = current.as_ref() {
            if held.cycle >= snapshot.cycle {
                debug!(
                    "Discarding stale cycle {} (holding cycle {})",
                    snapshot.cycle, held.cycle
                );
                return false;
            }
        }
        *current = Some(snapshot);
        true
    }

    pub async fn latest(&self) -> Option<Arc<Snapshot>> {
        self.inner.read().await.clone()
    }
}

/// Drives polling cycles and publishes their results.
pub struct Poller {
    aggregator: Arc<Aggregator>,
    store: SnapshotStore,
    interval: Duration,
    next_cycle: AtomicU64,
}

impl Poller {
    pub fn new(aggregator: Aggregator, store: SnapshotStore, interval: Duration) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            store,
            interval,
            next_cycle: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one cycle now and publish it. Returns this cycle's snapshot even
    /// if a newer one was already published.
    pub async fn refresh_now(&self) -> Arc<Snapshot> {
        let cycle = self.next_cycle.fetch_add(1, Ordering::SeqCst);
        let attempted = self.aggregator.registry().len();

        let report = self.aggregator.run_cycle().await;
        let snapshot = Arc::new(Snapshot::new(cycle, attempted, report));

        if self.store.publish(snapshot.clone()).await {
            info!(
                "Published cycle {}: {}/{} sites scored",
                cycle, snapshot.succeeded, snapshot.attempted
            );
        }
        snapshot
    }

    /// Start the polling loop. The first cycle starts immediately.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let poller = self.clone();
                tokio::spawn(async move {
                    poller.refresh_now().await;
                });
            }
        })
    }
}
