use custodia_execution::{execute_transaction, ExecutionContext};
use custodia_storage::db::Storage;
use custodia_types::state::BankState;
use custodia_types::transaction::Transaction;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info, warn};

/// Applies submitted transactions one at a time against the shared state,
/// journals the accepted ones, and snapshots the state on an interval.
/// The one-at-a-time loop is what makes every bank operation atomic and
/// totally ordered relative to every other.
pub struct ExecutorService {
    state: Arc<RwLock<BankState>>,
    storage: Arc<Storage>,
    tx_rx: mpsc::Receiver<Transaction>,
}

impl ExecutorService {
    pub fn new(
        state: Arc<RwLock<BankState>>,
        storage: Arc<Storage>,
        tx_rx: mpsc::Receiver<Transaction>,
    ) -> Self {
        Self { state, storage, tx_rx }
    }

    pub async fn run(mut self) {
        info!("Starting executor service");

        let mut snapshot_interval = tokio::time::interval(Duration::from_secs(5));
        let mut dirty = false;

        loop {
            tokio::select! {
                maybe_tx = self.tx_rx.recv() => {
                    let Some(tx) = maybe_tx else {
                        info!("Transaction channel closed, flushing final snapshot");
                        self.snapshot().await;
                        return;
                    };
                    let id = hex::encode(tx.id());
                    let mut state = self.state.write().await;
                    let mut ctx = ExecutionContext {
                        state: &mut state,
                        timestamp: unix_now(),
                    };
                    match execute_transaction(&tx, &mut ctx) {
                        Ok(()) => {
                            drop(state);
                            dirty = true;
                            match self.storage.append_tx(&tx) {
                                Ok(index) => info!(tx = %id, index, "applied"),
                                Err(e) => error!(tx = %id, "journal write failed: {}", e),
                            }
                        }
                        Err(e) => {
                            drop(state);
                            dirty = true; // a failed instruction still consumed a nonce
                            warn!(tx = %id, "rejected: {}", e);
                        }
                    }
                }
                _ = snapshot_interval.tick() => {
                    if dirty {
                        self.snapshot().await;
                        dirty = false;
                    }
                }
            }
        }
    }

    async fn snapshot(&self) {
        let state = self.state.read().await;
        if let Err(e) = self.storage.save_state(&state) {
            error!("Failed to save state snapshot: {}", e);
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
