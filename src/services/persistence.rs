//! Persistence service: fire-and-forget note writes plus a periodic full flush.
//!
//! DESIGN
//! ======
//! Engine actions are turned into `PersistOp`s and pushed onto a bounded
//! queue drained by a single writer task, so input handling never waits on
//! SQLite. Separately an autosave task snapshots the whole collection under
//! the read lock and writes every record lock-free.
//!
//! Ops are applied in queue order. [`settle`] pushes a barrier and waits for
//! the writer to reach it, so a caller about to rewrite the whole store knows
//! no older put can land afterwards.
//!
//! ERROR HANDLING
//! ==============
//! Failed writes are logged and dropped. There is no retry: the next
//! mutation or the next autosave writes the note again.

use std::sync::Arc;
use std::time::Duration;

use canvas::doc::{NoteId, NoteRecord};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::repository::NoteRepository;
use crate::state::AppState;

/// One job for the background writer.
#[derive(Debug)]
pub enum PersistOp {
    Put(NoteRecord),
    Delete(NoteId),
    /// Answered once every earlier op has been applied.
    Barrier(oneshot::Sender<()>),
}

impl PersistOp {
    fn note_id(&self) -> Option<NoteId> {
        match self {
            Self::Put(record) => Some(record.id),
            Self::Delete(id) => Some(*id),
            Self::Barrier(_) => None,
        }
    }
}

/// Spawn the writer task. It exits once every sender is dropped and the
/// queue is drained.
#[must_use]
pub fn spawn_writer(repo: Arc<dyn NoteRepository>, capacity: usize) -> (mpsc::Sender<PersistOp>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<PersistOp>(capacity.max(1));
    info!(queue_capacity = capacity, "note writer started");

    let handle = tokio::spawn(async move {
        while let Some(op) = rx.recv().await {
            match op {
                PersistOp::Put(record) => {
                    if let Err(e) = repo.put(&record).await {
                        error!(error = %e, id = %record.id, "note write failed");
                    }
                }
                PersistOp::Delete(id) => {
                    if let Err(e) = repo.delete_by_id(id).await {
                        error!(error = %e, %id, "note delete failed");
                    }
                }
                PersistOp::Barrier(ack) => {
                    if ack.send(()).is_err() {
                        debug!("barrier waiter went away");
                    }
                }
            }
        }
        debug!("note writer drained");
    });

    (tx, handle)
}

/// Best-effort, non-blocking enqueue. Without a writer the op is dropped.
pub fn enqueue(state: &AppState, op: PersistOp) {
    let Some(tx) = &state.persist_tx else {
        return;
    };

    match tx.try_send(op) {
        Ok(()) => {}
        Err(TrySendError::Full(op)) => {
            warn!(id = ?op.note_id(), "persist queue full; dropping write");
        }
        Err(TrySendError::Closed(op)) => {
            warn!(id = ?op.note_id(), "persist queue closed; dropping write");
        }
    }
}

/// Wait until the writer has applied every op queued before this call.
/// Returns at once when there is no writer.
pub async fn settle(state: &AppState) {
    let Some(tx) = &state.persist_tx else {
        return;
    };

    let (ack, reached) = oneshot::channel();
    if tx.send(PersistOp::Barrier(ack)).await.is_err() {
        warn!("persist queue closed; not waiting for queued writes");
        return;
    }
    if reached.await.is_err() {
        warn!("note writer stopped before the barrier");
    }
}

/// Spawn the periodic full-collection flush. The first flush happens one
/// period after startup.
#[must_use]
pub fn spawn_autosave(state: AppState, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "autosave configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            flush_all(&state).await;
        }
    })
}

/// Write every note in the collection. Returns how many writes succeeded.
pub async fn flush_all(state: &AppState) -> usize {
    // Snapshot under the lock, then write lock-free.
    let records = state.engine.read().await.records();
    if records.is_empty() {
        return 0;
    }

    let mut written = 0;
    for record in &records {
        match state.repo.put(record).await {
            Ok(()) => written += 1,
            Err(e) => error!(error = %e, id = %record.id, "autosave write failed"),
        }
    }
    debug!(written, total = records.len(), "autosave flushed");
    written
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
