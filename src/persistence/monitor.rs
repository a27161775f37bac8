//! Background task that drains dirty signals from the controller and saves
//! the snapshot.
//!
//! The channel feeding this task is bounded to a single slot and the
//! controller sends with `try_send`, dropping the signal if the slot is
//! already full. That coalescing, not anything in this file, is what turns
//! a burst of mutations into a single pending save - the monitor itself is
//! a plain drain loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::error;

use crate::queue::Controller;

use super::snapshot::SnapshotStore;

pub struct PersistenceMonitor {
    shutdown: Arc<AtomicBool>,
}

impl PersistenceMonitor {
    /// Spawn the drain loop. Returns a handle whose [`PersistenceMonitor::stop`]
    /// signals the loop to exit after its current save, if any, completes.
    pub fn spawn(
        controller: Arc<Controller>,
        snapshot: Arc<SnapshotStore>,
        mut dirty_rx: mpsc::Receiver<bool>,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let loop_shutdown = shutdown.clone();

        tokio::spawn(async move {
            while let Some(_signal) = dirty_rx.recv().await {
                if loop_shutdown.load(Ordering::SeqCst) {
                    break;
                }

                let store = controller.snapshot();
                if let Err(err) = snapshot.save(&store) {
                    error!(error = %err, "failed to save snapshot");
                }
            }
        });

        Self { shutdown }
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}
