//! Live Driver
//!
//! Steps a shared controller at a fixed cadence and pushes every resulting
//! snapshot to subscribers. The driver only ever stops between ticks: when
//! the last subscriber goes away, when shutdown is requested, or at an
//! optional tick limit.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use society_events::WorldSnapshot;

use crate::interventions::{apply_interventions, SocietyController};

/// Snapshots buffered per subscriber before slow ones start lagging
const CHANNEL_CAPACITY: usize = 64;

/// Why a driver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Disconnected,
    Shutdown,
    TickLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSummary {
    pub ticks: u64,
    pub reason: StopReason,
}

/// Requests a running driver to stop at the next tick boundary
#[derive(Debug, Clone)]
pub struct ShutdownHandle(Arc<watch::Sender<bool>>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.0.send(true);
    }
}

pub struct LiveDriver {
    controller: Arc<Mutex<SocietyController>>,
    cadence: Duration,
    max_ticks: Option<u64>,
    snapshot_tx: broadcast::Sender<WorldSnapshot>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
    interventions_dir: Option<PathBuf>,
}

impl LiveDriver {
    pub fn new(controller: Arc<Mutex<SocietyController>>, cadence: Duration) -> Self {
        let (snapshot_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            controller,
            cadence,
            max_ticks: None,
            snapshot_tx,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
            interventions_dir: None,
        }
    }

    pub fn with_tick_limit(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Apply intervention files from `dir` before each tick
    pub fn with_interventions(mut self, dir: impl Into<PathBuf>) -> Self {
        self.interventions_dir = Some(dir.into());
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorldSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown_tx))
    }

    pub fn controller(&self) -> Arc<Mutex<SocietyController>> {
        Arc::clone(&self.controller)
    }

    /// Drive the society until one of the stop conditions holds.
    pub async fn run(mut self) -> DriverSummary {
        let mut interval = tokio::time::interval(self.cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick completes immediately
        interval.tick().await;

        let mut ticks = 0;
        let reason = loop {
            if self.max_ticks.is_some_and(|limit| ticks >= limit) {
                break StopReason::TickLimit;
            }

            tokio::select! {
                _ = interval.tick() => {}
                _ = self.shutdown_rx.changed() => {}
            }
            if *self.shutdown_rx.borrow() {
                break StopReason::Shutdown;
            }
            if self.snapshot_tx.receiver_count() == 0 {
                break StopReason::Disconnected;
            }

            let snapshot = self.advance().await;
            ticks += 1;
            debug!(tick = snapshot.tick, agents = snapshot.num_agents, "pushing snapshot");
            if self.snapshot_tx.send(snapshot).is_err() {
                break StopReason::Disconnected;
            }
        };

        self.controller.lock().await.flush_events();
        info!(ticks, ?reason, "live driver stopped");
        DriverSummary { ticks, reason }
    }

    async fn advance(&self) -> WorldSnapshot {
        let mut controller = self.controller.lock().await;
        if let Some(dir) = &self.interventions_dir {
            apply_interventions(dir, &mut controller);
        }
        controller.step()
    }
}
