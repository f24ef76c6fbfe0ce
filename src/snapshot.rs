use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};

use crate::mex::models::RawReading;

/// The latest successfully fetched reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub reading: RawReading,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(reading: RawReading) -> Self {
        Self {
            reading,
            fetched_at: Utc::now(),
        }
    }
}

/// Holder of the single latest `Snapshot`, with replace-and-notify semantics.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// Readers get an `Arc<Snapshot>` that stays valid while a newer snapshot is
/// swapped in, so nobody ever observes a half-written reading.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Option<Arc<Snapshot>>>>,
    /// Bumped after every replace; subscribers wake on change.
    generation: Arc<watch::Sender<u64>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            inner: Arc::default(),
            generation: Arc::new(generation),
        }
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in `snapshot` wholesale and notify subscribers.
    pub async fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.inner.write().await = Some(Arc::clone(&snapshot));
        self.generation.send_modify(|g| *g += 1);
        snapshot
    }

    /// The current snapshot, if any poll has succeeded yet.
    pub async fn latest(&self) -> Option<Arc<Snapshot>> {
        self.inner.read().await.clone()
    }

    /// Number of snapshots committed so far.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Receiver that is marked changed whenever a new snapshot is committed.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}
