//! When and what to flush to the mastery store.
//!
//! Outcomes recorded by the session accumulate as pending updates (one per
//! card key, last write wins). Every advance counts as one review; when the
//! count reaches the threshold the pending updates are emitted as a
//! [`FlushBatch`] and the count restarts at zero.
//!
//! A session that completes below the threshold flushes its remainder when
//! [`SyncPolicy::flush_on_complete`] is set. A reset of a boolean-mastery
//! session emits an unconditional overwrite of the whole deck to
//! `known = false`, independent of the counter.

use drillkit::{CardKey, CardUpdate};
use serde::Serialize;
use tracing::debug;

use crate::session::SessionState;

/// Reviews between automatic flushes.
pub const DEFAULT_FLUSH_THRESHOLD: u32 = 10;

/// Why a batch was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushReason {
    /// The reviews-since-flush counter reached the threshold.
    Threshold,
    /// The session completed with pending updates.
    Completion,
    /// The session was reset; the batch overwrites the whole deck.
    Reset,
}

/// A batch of mastery updates for the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlushBatch {
    /// Why the batch was emitted.
    pub reason: FlushReason,
    /// At most one entry per card key and field.
    pub updates: Vec<CardUpdate>,
}

impl FlushBatch {
    /// Create a batch.
    pub fn new(reason: FlushReason, updates: Vec<CardUpdate>) -> Self {
        Self { reason, updates }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether the batch has no entries.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Keys in the batch, in entry order.
    pub fn keys(&self) -> Vec<CardKey> {
        self.updates.iter().map(|u| u.key).collect()
    }

    /// Fold a later batch into this one.
    ///
    /// Entries writing the same field of a key already present are
    /// overwritten in place; anything else is appended. The reason becomes the later batch's reason.
    pub fn merge(&mut self, later: FlushBatch) {
        for update in later.updates {
            upsert(&mut self.updates, update);
        }
        self.reason = later.reason;
    }
}

/// Flush threshold and completion behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Reviews between automatic flushes. Zero behaves like one.
    pub threshold: u32,
    /// Flush pending sub-threshold updates when the session completes.
    pub flush_on_complete: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FLUSH_THRESHOLD,
            flush_on_complete: true,
        }
    }
}

impl SyncPolicy {
    /// Record the target state of a card, replacing any earlier pending
    /// update for the same key.
    pub fn record(&self, state: &mut SessionState, update: CardUpdate) {
        upsert(&mut state.pending, update);
    }

    /// Count one review and emit a batch if the threshold was reached.
    pub fn on_review(&self, state: &mut SessionState) -> Option<FlushBatch> {
        state.reviews_since_flush += 1;
        if state.reviews_since_flush < self.threshold.max(1) {
            return None;
        }

        state.reviews_since_flush = 0;
        let batch = take_pending(state, FlushReason::Threshold);
        if let Some(batch) = &batch {
            debug!(entries = batch.len(), "Review threshold reached, flushing");
        }
        batch
    }

    /// Emit the pending remainder when a session completes.
    pub fn on_complete(&self, state: &mut SessionState) -> Option<FlushBatch> {
        if !self.flush_on_complete {
            return None;
        }

        let batch = take_pending(state, FlushReason::Completion);
        if batch.is_some() {
            state.reviews_since_flush = 0;
        }
        batch
    }

    /// Full-deck overwrite to `known = false`.
    pub fn reset_batch(&self, keys: impl IntoIterator<Item = CardKey>) -> FlushBatch {
        FlushBatch::new(
            FlushReason::Reset,
            keys.into_iter().map(|k| CardUpdate::known(k, false)).collect(),
        )
    }
}

fn take_pending(state: &mut SessionState, reason: FlushReason) -> Option<FlushBatch> {
    if state.pending.is_empty() {
        return None;
    }
    Some(FlushBatch::new(reason, std::mem::take(&mut state.pending)))
}

// Entries match on key and on the field they write.
fn upsert(updates: &mut Vec<CardUpdate>, update: CardUpdate) {
    let field = std::mem::discriminant(&update.update);
    match updates
        .iter_mut()
        .find(|u| u.key == update.key && std::mem::discriminant(&u.update) == field)
    {
        Some(existing) => *existing = update,
        None => updates.push(update),
    }
}
