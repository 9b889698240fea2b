//! Background purge of expired verification codes.
//!
//! Expiry is always re-checked at lookup time, so the sweeper only bounds
//! memory; stopping it never makes an expired code valid again.

use crate::domain::code_vault::CodeVault;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Handle to a running sweeper task.
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<usize>,
}

impl SweeperHandle {
    /// Stops the sweeper and returns the total number of records it removed.
    pub async fn shutdown(mut self) -> usize {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.task.await {
            Ok(total) => total,
            Err(e) => {
                warn!("sweeper task ended abnormally: {}", e);
                0
            }
        }
    }
}

/// Spawns a task that calls [`CodeVault::sweep_expired`] every `interval`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_sweeper(vault: Arc<CodeVault>, interval: Duration) -> SweeperHandle {
    let (tx, mut rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        let mut total = 0;
        loop {
            tokio::select! {
                _ = &mut rx => break,
                _ = ticker.tick() => {
                    total += vault.sweep_expired();
                }
            }
        }
        debug!(total, "sweeper stopped");
        total
    });

    SweeperHandle {
        shutdown: Some(tx),
        task,
    }
}
