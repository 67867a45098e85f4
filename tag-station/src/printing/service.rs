//! Label print service
//!
//! The caller side of the executor: owns the pending queue, prevents two
//! batches from running at once, and clears printed labels only after a
//! fully successful batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use shared::{Draft, LabelError, LabelId, QueuedLabel};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use super::executor::PrintExecutor;
use super::gateway::DeviceGateway;
use super::types::{DispatchStatus, PrintOutcome};
use crate::queue::{PendingQueue, QueueStorageError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid label: {0}")]
    Label(#[from] LabelError),

    #[error("Queue storage error: {0}")]
    Storage(#[from] QueueStorageError),

    #[error("Label not found: {0}")]
    NotFound(LabelId),

    #[error("A print job is already running")]
    AlreadyPrinting,

    #[error("Cannot resume from label {start}: queue has {len} label(s)")]
    InvalidResumeIndex { start: usize, len: usize },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Label print service
pub struct LabelPrintService<G> {
    executor: PrintExecutor<G>,
    queue: Mutex<PendingQueue>,
    printing: AtomicBool,
}

/// Clears the in-flight flag however the batch ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<G: DeviceGateway> LabelPrintService<G> {
    pub fn new(executor: PrintExecutor<G>, queue: PendingQueue) -> Self {
        Self {
            executor,
            queue: Mutex::new(queue),
            printing: AtomicBool::new(false),
        }
    }

    pub fn executor(&self) -> &PrintExecutor<G> {
        &self.executor
    }

    pub fn subscribe(&self) -> watch::Receiver<DispatchStatus> {
        self.executor.subscribe()
    }

    pub fn is_printing(&self) -> bool {
        self.printing.load(Ordering::Acquire)
    }

    // ========== Queue ==========

    /// Commit a draft into the queue
    pub fn add(&self, draft: &Draft) -> ServiceResult<QueuedLabel> {
        let label = draft.commit()?;
        self.queue().push(label.clone())?;
        info!(label_id = %label.id(), "Label queued");
        Ok(label)
    }

    pub fn labels(&self) -> Vec<QueuedLabel> {
        self.queue().labels().to_vec()
    }

    pub fn get(&self, id: LabelId) -> ServiceResult<QueuedLabel> {
        self.queue().get(id).cloned().ok_or(ServiceError::NotFound(id))
    }

    pub fn remove(&self, id: LabelId) -> ServiceResult<QueuedLabel> {
        self.queue().remove(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Take a label out of the queue for editing
    pub fn edit(&self, id: LabelId) -> ServiceResult<Draft> {
        self.queue().edit(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Swap a queued label for an edited draft. The new record is stored
    /// before the old one is dropped, so a failed write loses nothing.
    pub fn replace(&self, id: LabelId, draft: &Draft) -> ServiceResult<QueuedLabel> {
        let mut queue = self.queue();
        if queue.get(id).is_none() {
            return Err(ServiceError::NotFound(id));
        }
        let label = draft.commit()?;
        queue.push(label.clone())?;
        queue.remove(id)?;
        info!(old_id = %id, label_id = %label.id(), "Label replaced");
        Ok(label)
    }

    pub fn clear(&self) -> ServiceResult<usize> {
        Ok(self.queue().clear()?)
    }

    // ========== Markup ==========

    /// The exact command stream a queued label prints as
    pub fn zpl_for(&self, id: LabelId) -> ServiceResult<String> {
        let label = self.get(id)?;
        Ok(self.executor.encode(&label))
    }

    /// Live preview of an uncommitted draft
    pub fn preview(&self, draft: &Draft) -> Option<String> {
        self.executor.renderer().render_preview(draft)
    }

    // ========== Printing ==========

    /// Print the whole queue
    pub async fn print_pending(&self) -> ServiceResult<PrintOutcome> {
        self.print_from(0).await
    }

    /// Print the queue starting at `start`, for resuming after a partial
    /// failure whose first `start` labels already came out of the printer.
    ///
    /// Indices in the outcome refer to the whole queue. On success every
    /// label of the snapshot is removed; otherwise the queue is untouched.
    #[instrument(skip(self))]
    pub async fn print_from(&self, start: usize) -> ServiceResult<PrintOutcome> {
        if self
            .printing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ServiceError::AlreadyPrinting);
        }
        let _guard = InFlight(&self.printing);

        let snapshot = self.labels();
        if start > 0 && start >= snapshot.len() {
            return Err(ServiceError::InvalidResumeIndex {
                start,
                len: snapshot.len(),
            });
        }

        let outcome = self
            .executor
            .print_all(&snapshot[start..])
            .await
            .shifted(start);

        if outcome.is_success() {
            let ids: Vec<LabelId> = snapshot.iter().map(|l| l.id()).collect();
            let removed = self.queue().remove_many(&ids)?;
            info!(removed, "Printed labels cleared from queue");
        } else {
            warn!(status = %outcome.status_message(), "Queue kept after failed batch");
        }

        Ok(outcome)
    }

    fn queue(&self) -> MutexGuard<'_, PendingQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
