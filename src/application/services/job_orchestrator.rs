use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{JobStore, JobStoreError};
use crate::domain::{
    BatchItemOutcome, ErrorKind, ExtractionFailure, ExtractionJob, ExtractionOptions, JobId,
    JobKind, JobPriority, JobStatus, MimeKind,
};

/// One file inside a batch submission.
pub struct BatchFile {
    pub filename: String,
    pub data: Vec<u8>,
    pub mime: MimeKind,
}

pub struct SinglePayload {
    pub filename: String,
    pub data: Vec<u8>,
    pub mime: MimeKind,
    pub options: ExtractionOptions,
}

pub struct BatchPayload {
    pub files: Vec<BatchFile>,
    /// Items rejected during upload validation. They ride along so the
    /// finished job reports every file the caller sent.
    pub rejected: Vec<BatchItemOutcome>,
    pub options: ExtractionOptions,
}

pub enum JobPayload {
    Single(SinglePayload),
    Batch(BatchPayload),
}

pub struct JobMessage {
    pub job_id: JobId,
    pub payload: JobPayload,
}

/// Cancellation tokens for jobs that are queued or running.
#[derive(Default)]
pub struct CancellationRegistry {
    inner: Mutex<HashMap<JobId, CancellationToken>>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, id: JobId) -> CancellationToken {
        let token = CancellationToken::new();
        self.inner.lock().await.insert(id, token.clone());
        token
    }

    pub async fn get(&self, id: JobId) -> Option<CancellationToken> {
        self.inner.lock().await.get(&id).cloned()
    }

    pub async fn cancel(&self, id: JobId) {
        if let Some(token) = self.inner.lock().await.get(&id) {
            token.cancel();
        }
    }

    pub async fn remove(&self, id: JobId) {
        self.inner.lock().await.remove(&id);
    }
}

/// Watch channels that settle once a job reaches a terminal state, so
/// synchronous callers can wait without polling.
#[derive(Default)]
pub struct JobWatchers {
    inner: Mutex<HashMap<JobId, watch::Sender<bool>>>,
}

impl JobWatchers {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, id: JobId) {
        let (sender, _) = watch::channel(false);
        self.inner.lock().await.insert(id, sender);
    }

    pub async fn subscribe(&self, id: JobId) -> Option<watch::Receiver<bool>> {
        self.inner.lock().await.get(&id).map(watch::Sender::subscribe)
    }

    pub async fn notify_terminal(&self, id: JobId) {
        if let Some(sender) = self.inner.lock().await.remove(&id) {
            let _ = sender.send(true);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("extraction queue is full")]
    QueueFull,
    #[error("extraction workers unavailable")]
    WorkersUnavailable,
    #[error("job store: {0}")]
    Store(#[from] JobStoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    NotFound,
    AlreadyFinished(JobStatus),
    Cancelled,
}

/// Accepts extraction jobs, queues them by priority, and exposes
/// waiting and cancellation on top of the job store.
pub struct JobOrchestrator {
    store: Arc<dyn JobStore>,
    high_tx: mpsc::Sender<JobMessage>,
    normal_tx: mpsc::Sender<JobMessage>,
    watchers: Arc<JobWatchers>,
    cancellations: Arc<CancellationRegistry>,
    sync_wait: Duration,
}

impl JobOrchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        high_tx: mpsc::Sender<JobMessage>,
        normal_tx: mpsc::Sender<JobMessage>,
        watchers: Arc<JobWatchers>,
        cancellations: Arc<CancellationRegistry>,
        sync_wait: Duration,
    ) -> Self {
        Self {
            store,
            high_tx,
            normal_tx,
            watchers,
            cancellations,
            sync_wait,
        }
    }

    pub async fn submit_single(&self, payload: SinglePayload) -> Result<JobId, SubmitError> {
        let job = ExtractionJob::new(
            JobKind::Single {
                filename: payload.filename.clone(),
            },
            payload.options.priority,
        );
        let priority = payload.options.priority;
        self.enqueue(job, JobPayload::Single(payload), priority).await
    }

    pub async fn submit_batch(&self, payload: BatchPayload) -> Result<JobId, SubmitError> {
        let job = ExtractionJob::new(
            JobKind::Batch {
                file_count: payload.files.len() + payload.rejected.len(),
            },
            payload.options.priority,
        );
        let priority = payload.options.priority;
        self.enqueue(job, JobPayload::Batch(payload), priority).await
    }

    async fn enqueue(
        &self,
        job: ExtractionJob,
        payload: JobPayload,
        priority: JobPriority,
    ) -> Result<JobId, SubmitError> {
        let job_id = job.id;
        self.store.create(&job).await?;
        self.watchers.register(job_id).await;
        self.cancellations.register(job_id).await;

        let queue = match priority {
            JobPriority::High => &self.high_tx,
            JobPriority::Normal => &self.normal_tx,
        };

        let message = JobMessage { job_id, payload };
        if let Err(send_error) = queue.try_send(message) {
            self.discard(job_id).await;
            return match send_error {
                mpsc::error::TrySendError::Full(_) => Err(SubmitError::QueueFull),
                mpsc::error::TrySendError::Closed(_) => Err(SubmitError::WorkersUnavailable),
            };
        }

        tracing::info!(
            job_id = %job_id.as_uuid(),
            document = %job.kind.describe(),
            priority = %priority,
            "Extraction job queued"
        );
        Ok(job_id)
    }

    async fn discard(&self, job_id: JobId) {
        self.cancellations.remove(job_id).await;
        self.watchers.notify_terminal(job_id).await;
        if let Err(e) = self.store.delete(job_id).await {
            tracing::warn!(error = %e, job_id = %job_id.as_uuid(), "Failed to discard unqueued job");
        }
    }

    /// Waits up to the configured window for the job to settle, then
    /// returns its latest state. `None` means the job is unknown.
    pub async fn wait_for_terminal(
        &self,
        job_id: JobId,
    ) -> Result<Option<ExtractionJob>, JobStoreError> {
        // Subscribing before the first read closes the gap where a job
        // finishes between the read and the wait.
        let receiver = self.watchers.subscribe(job_id).await;

        let Some(job) = self.store.get(job_id).await? else {
            return Ok(None);
        };
        if job.status.is_terminal() {
            return Ok(Some(job));
        }

        if let Some(mut receiver) = receiver {
            let _ = tokio::time::timeout(self.sync_wait, receiver.wait_for(|done| *done)).await;
        }

        self.store.get(job_id).await
    }

    pub async fn cancel(&self, job_id: JobId) -> Result<CancelOutcome, JobStoreError> {
        let Some(job) = self.store.get(job_id).await? else {
            return Ok(CancelOutcome::NotFound);
        };

        if job.status.is_terminal() {
            return Ok(CancelOutcome::AlreadyFinished(job.status));
        }

        if job.status == JobStatus::Queued {
            // A worker that already pulled the message will see the
            // terminal state and skip it.
            self.store
                .fail(
                    job_id,
                    ExtractionFailure::new(ErrorKind::JobCancelled, "cancelled before start"),
                )
                .await?;
            self.cancellations.cancel(job_id).await;
            self.cancellations.remove(job_id).await;
            self.watchers.notify_terminal(job_id).await;
        } else {
            self.cancellations.cancel(job_id).await;
        }

        tracing::info!(job_id = %job_id.as_uuid(), "Extraction job cancelled");
        Ok(CancelOutcome::Cancelled)
    }
}
