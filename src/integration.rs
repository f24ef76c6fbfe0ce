use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle};
use tracing::info;

use crate::{
    config::Config,
    coordinator::{Coordinator, UpdateStatus},
    error::MexError,
    mex::MexClient,
    sensors::{MexField, SensorState},
    snapshot::SnapshotStore,
};

/// A set-up instance: the coordinator plus its polling task.
///
/// Returned by [`Integration::setup`] and consumed by
/// [`Integration::unload`]; the caller owns it, there is no global registry.
pub struct Integration {
    coordinator: Coordinator,
    poller: JoinHandle<()>,
}

impl Integration {
    pub async fn setup(config: &Config) -> Result<Self, MexError> {
        Self::setup_with(MexClient::new(config), config.poll_interval()).await
    }

    /// Perform the first refresh and start polling.
    ///
    /// Setup fails when the first refresh fails; nothing is spawned then.
    pub async fn setup_with(client: MexClient, interval: Duration) -> Result<Self, MexError> {
        let coordinator = Coordinator::new(client, SnapshotStore::new(), interval);
        coordinator.refresh().await?;

        let poller = tokio::spawn(coordinator.clone().run());
        info!(
            sensors = MexField::ALL.len(),
            interval_secs = interval.as_secs(),
            "Heizöl24 MEX integration set up"
        );

        Ok(Self { coordinator, poller })
    }

    /// Stop polling and release the coordinator.
    pub async fn unload(self) {
        self.poller.abort();
        // A cancelled JoinError is the expected outcome here.
        let _ = self.poller.await;
        info!("Heizöl24 MEX integration unloaded");
    }

    /// False once the polling loop has stopped after rejected credentials.
    pub fn is_polling(&self) -> bool {
        !self.poller.is_finished()
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub async fn states(&self) -> Vec<SensorState> {
        self.coordinator.sensor_states().await
    }

    pub async fn state(&self, field: MexField) -> SensorState {
        self.coordinator.sensor_state(field).await
    }

    pub async fn status(&self) -> UpdateStatus {
        self.coordinator.status().await
    }

    /// Marked changed whenever a poll commits a new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.coordinator.store().subscribe()
    }
}
