use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{
    sync::{Mutex, RwLock},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{error, info, warn};

use crate::{
    error::MexError,
    mex::MexClient,
    sensors::{derive_all, MexField, SensorState},
    snapshot::{Snapshot, SnapshotStore},
};

/// Outcome of the most recent poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateStatus {
    pub last_update_success: bool,
    /// `"connectivity"` or `"authentication"` after a failed cycle.
    pub failure_kind: Option<&'static str>,
    pub failure_message: Option<String>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
}

/// Drives poll cycles and owns the snapshot they produce.
///
/// Exactly one cycle runs at a time: the first at setup via [`refresh`],
/// then one per tick of [`run`]. Callers of [`refresh`] queue behind a cycle
/// already in flight. A failed cycle leaves the previous snapshot in place;
/// connectivity failures wait for the next tick, authentication failures stop
/// the loop.
///
/// [`refresh`]: Coordinator::refresh
/// [`run`]: Coordinator::run
#[derive(Clone)]
pub struct Coordinator {
    client: MexClient,
    store: SnapshotStore,
    status: Arc<RwLock<UpdateStatus>>,
    /// Held for the whole of a cycle.
    cycle: Arc<Mutex<()>>,
    interval: Duration,
}

impl Coordinator {
    pub fn new(client: MexClient, store: SnapshotStore, interval: Duration) -> Self {
        Self {
            client,
            store,
            status: Arc::default(),
            cycle: Arc::default(),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Run one poll cycle and commit its snapshot on success.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, MexError> {
        let _cycle = self.cycle.lock().await;
        info!(username = %self.client.username(), "Polling Heizöl24 dashboard");
        let attempted_at = Utc::now();

        match self.client.fetch().await {
            Ok(reading) => {
                let snapshot = self
                    .store
                    .replace(Snapshot {
                        reading,
                        fetched_at: attempted_at,
                    })
                    .await;

                *self.status.write().await = UpdateStatus {
                    last_update_success: true,
                    failure_kind: None,
                    failure_message: None,
                    last_attempt: Some(attempted_at),
                    last_success: Some(attempted_at),
                };

                info!(
                    generation = self.store.generation(),
                    fields = snapshot.reading.len(),
                    "Snapshot committed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                if e.is_auth_failure() {
                    error!(error = %e, "Authentication failed; credentials need to be updated");
                } else {
                    warn!(error = %e, "Error communicating with Heizöl24 API");
                }

                let mut status = self.status.write().await;
                status.last_update_success = false;
                status.failure_kind = Some(e.kind());
                status.failure_message = Some(e.to_string());
                status.last_attempt = Some(attempted_at);
                Err(e)
            }
        }
    }

    /// Runs the polling loop, one cycle per interval.
    ///
    /// The first tick fires one full interval after start because setup has
    /// already performed the initial refresh. Returns once a cycle fails
    /// authentication; rejected credentials are not sent again. Spawn this via
    /// `tokio::spawn`.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Polling loop started");
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.refresh().await {
                if e.is_auth_failure() {
                    error!("Polling stopped until the credentials are replaced");
                    break;
                }
            }
        }
    }

    pub async fn status(&self) -> UpdateStatus {
        self.status.read().await.clone()
    }

    /// States of every sensor, derived from the latest snapshot.
    pub async fn sensor_states(&self) -> Vec<SensorState> {
        let snapshot = self.store.latest().await;
        derive_all(snapshot.as_deref())
    }

    pub async fn sensor_state(&self, field: MexField) -> SensorState {
        match self.store.latest().await {
            Some(snapshot) => SensorState::from_snapshot(field, &snapshot),
            None => SensorState::unavailable(field),
        }
    }
}
