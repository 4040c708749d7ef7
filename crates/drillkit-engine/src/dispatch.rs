//! Fire-and-forget delivery of mastery batches.
//!
//! A [`FlushQueue`] owns a single background task that pushes batches to a
//! [`MasterySink`] in the order they were sent. [`FlushQueue::send`] never
//! waits, so the session keeps moving while a push is in flight.
//!
//! Batches that pile up behind a slow push are coalesced into one before the
//! next attempt; for a given card key and field the latest value wins. Each
//! push is tried once. A failure is logged and the batch is dropped.
//!
//! # Example
//!
//! ```no_run
//! use drillkit_engine::Engine;
//! use drillkit_engine::sync::{FlushBatch, FlushReason};
//! use drillkit_engine::CardUpdate;
//!
//! # async fn example() {
//! let engine = Engine::new();
//! let queue = engine.flush_queue();
//!
//! queue.send(FlushBatch::new(
//!     FlushReason::Completion,
//!     vec![CardUpdate::known(1, true)],
//! ));
//!
//! let stats = queue.shutdown().await;
//! println!("{} batches delivered", stats.sent);
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use drillkit::{CardUpdate, DrillClient};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::sync::FlushBatch;

/// Destination for mastery updates.
pub trait MasterySink: Send + Sync + 'static {
    /// Persist one batch of updates.
    fn push(&self, updates: &[CardUpdate]) -> impl Future<Output = Result<()>> + Send;
}

impl MasterySink for DrillClient {
    async fn push(&self, updates: &[CardUpdate]) -> Result<()> {
        self.mastery().update(updates).await.map_err(Error::Client)
    }
}

impl<T: MasterySink> MasterySink for Arc<T> {
    fn push(&self, updates: &[CardUpdate]) -> impl Future<Output = Result<()>> + Send {
        (**self).push(updates)
    }
}

/// Delivery counters reported by [`FlushQueue::shutdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlushStats {
    /// Pushes that succeeded.
    pub sent: usize,
    /// Pushes that failed.
    pub failed: usize,
    /// Batches folded into an earlier one before sending.
    pub coalesced: usize,
    /// Update entries delivered.
    pub updates: usize,
}

/// Background sender for mastery batches.
///
/// Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct FlushQueue {
    tx: mpsc::UnboundedSender<FlushBatch>,
    worker: JoinHandle<FlushStats>,
}

impl FlushQueue {
    /// Start the delivery task for `sink`.
    pub fn spawn<K: MasterySink>(sink: K) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(deliver(sink, rx));
        Self { tx, worker }
    }

    /// Queue a batch without waiting for delivery. Empty batches are ignored.
    pub fn send(&self, batch: FlushBatch) {
        if batch.is_empty() {
            return;
        }
        debug!(reason = ?batch.reason, entries = batch.len(), "Queueing mastery batch");
        if self.tx.send(batch).is_err() {
            warn!("Mastery worker has stopped, batch dropped");
        }
    }

    /// Deliver whatever is still queued, then stop the worker.
    pub async fn shutdown(self) -> FlushStats {
        drop(self.tx);
        match self.worker.await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Mastery worker did not finish cleanly");
                FlushStats::default()
            }
        }
    }
}

async fn deliver<K: MasterySink>(sink: K, mut rx: mpsc::UnboundedReceiver<FlushBatch>) -> FlushStats {
    let mut stats = FlushStats::default();

    while let Some(mut batch) = rx.recv().await {
        while let Ok(later) = rx.try_recv() {
            batch.merge(later);
            stats.coalesced += 1;
        }

        match sink.push(&batch.updates).await {
            Ok(()) => {
                debug!(reason = ?batch.reason, entries = batch.len(), "Mastery batch delivered");
                stats.sent += 1;
                stats.updates += batch.len();
            }
            Err(e) => {
                warn!(
                    error = %e,
                    reason = ?batch.reason,
                    entries = batch.len(),
                    "Mastery update failed, batch dropped"
                );
                stats.failed += 1;
            }
        }
    }

    stats
}
