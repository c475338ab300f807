use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::application::ports::{DocumentIngest, JobStore, NoopProgress, ProgressSink};
use crate::application::services::extraction_pipeline::ExtractionPipeline;
use crate::application::services::job_orchestrator::{
    BatchPayload, CancellationRegistry, JobMessage, JobPayload, JobWatchers, SinglePayload,
};
use crate::domain::{BatchItemOutcome, ErrorKind, ExtractionFailure, JobId, JobResult, JobStatus};

/// Receiver end of a job queue, shared across the worker pool.
pub type SharedQueue = Arc<Mutex<mpsc::Receiver<JobMessage>>>;

/// Progress reporter that writes through to the job store. Failed
/// updates are dropped; progress is advisory.
struct StoreProgress {
    store: Arc<dyn JobStore>,
    job_id: JobId,
}

#[async_trait]
impl ProgressSink for StoreProgress {
    async fn report(&self, pct: u8) {
        if let Err(e) = self.store.set_progress(self.job_id, pct).await {
            tracing::debug!(
                error = %e,
                job_id = %self.job_id.as_uuid(),
                "Progress update dropped"
            );
        }
    }
}

/// Pulls jobs off the priority queues and drives them through the
/// pipeline. High-priority work is always preferred when both queues
/// have messages.
pub struct ExtractionWorker<I>
where
    I: DocumentIngest,
{
    id: usize,
    high_rx: SharedQueue,
    normal_rx: SharedQueue,
    pipeline: Arc<ExtractionPipeline<I>>,
    store: Arc<dyn JobStore>,
    watchers: Arc<JobWatchers>,
    cancellations: Arc<CancellationRegistry>,
}

impl<I> ExtractionWorker<I>
where
    I: DocumentIngest + 'static,
{
    pub fn new(
        id: usize,
        high_rx: SharedQueue,
        normal_rx: SharedQueue,
        pipeline: Arc<ExtractionPipeline<I>>,
        store: Arc<dyn JobStore>,
        watchers: Arc<JobWatchers>,
        cancellations: Arc<CancellationRegistry>,
    ) -> Self {
        Self {
            id,
            high_rx,
            normal_rx,
            pipeline,
            store,
            watchers,
            cancellations,
        }
    }

    pub async fn run(self) {
        tracing::info!(worker = self.id, "Extraction worker started");
        while let Some(msg) = self.next_message().await {
            let span = tracing::info_span!(
                "extraction_job",
                job_id = %msg.job_id.as_uuid(),
                worker = self.id,
            );
            self.process(msg).instrument(span).await;
        }
        tracing::info!(worker = self.id, "Extraction worker stopped: queues closed");
    }

    async fn next_message(&self) -> Option<JobMessage> {
        {
            let mut high = self.high_rx.lock().await;
            match high.try_recv() {
                Ok(msg) => return Some(msg),
                Err(mpsc::error::TryRecvError::Empty) => {}
                Err(mpsc::error::TryRecvError::Disconnected) => {}
            }
        }

        tokio::select! {
            biased;
            msg = async { self.high_rx.lock().await.recv().await } => match msg {
                Some(msg) => Some(msg),
                None => self.normal_rx.lock().await.recv().await,
            },
            msg = async { self.normal_rx.lock().await.recv().await } => match msg {
                Some(msg) => Some(msg),
                None => self.high_rx.lock().await.recv().await,
            },
        }
    }

    async fn process(&self, msg: JobMessage) {
        let job_id = msg.job_id;

        match self.store.get(job_id).await {
            Ok(Some(job)) if job.status == JobStatus::Queued => {}
            Ok(Some(job)) => {
                tracing::info!(status = %job.status, "Skipping job no longer queued");
                self.finish(job_id).await;
                return;
            }
            Ok(None) => {
                tracing::warn!("Dequeued a job the store does not know");
                self.finish(job_id).await;
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Job lookup failed");
                self.finish(job_id).await;
                return;
            }
        }

        if let Err(e) = self.store.mark_running(job_id).await {
            tracing::info!(error = %e, "Job could not start, skipping");
            self.finish(job_id).await;
            return;
        }

        let cancel = self
            .cancellations
            .get(job_id)
            .await
            .unwrap_or_else(CancellationToken::new);
        let progress = StoreProgress {
            store: Arc::clone(&self.store),
            job_id,
        };

        let result = match msg.payload {
            JobPayload::Single(single) => self.process_single(single, &cancel, &progress).await,
            JobPayload::Batch(batch) => self.process_batch(batch, &cancel, &progress).await,
        };

        match result {
            Ok(job_result) => {
                if let Err(e) = self.store.complete(job_id, job_result).await {
                    tracing::error!(error = %e, "Failed to record job completion");
                } else {
                    tracing::info!("Extraction job completed");
                }
            }
            Err(failure) => {
                tracing::warn!(
                    kind = %failure.kind,
                    reason = %failure.reason,
                    "Extraction job failed"
                );
                if let Err(e) = self.store.fail(job_id, failure).await {
                    tracing::error!(error = %e, "Failed to record job failure");
                }
            }
        }

        self.finish(job_id).await;
    }

    async fn process_single(
        &self,
        single: SinglePayload,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> Result<JobResult, ExtractionFailure> {
        let outcome = self
            .pipeline
            .run(&single.data, single.mime, &single.options, cancel, progress)
            .await?;
        Ok(JobResult::Contacts {
            candidates: outcome.candidates,
            from_cache: outcome.from_cache,
        })
    }

    async fn process_batch(
        &self,
        batch: BatchPayload,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> Result<JobResult, ExtractionFailure> {
        let total = batch.files.len() + batch.rejected.len();
        let mut outcomes = batch.rejected;

        let mut done = outcomes.len();
        for file in batch.files {
            if cancel.is_cancelled() {
                return Err(ExtractionFailure::new(
                    ErrorKind::JobCancelled,
                    "cancelled by caller",
                ));
            }

            match self
                .pipeline
                .run(&file.data, file.mime, &batch.options, cancel, &NoopProgress)
                .await
            {
                Ok(outcome) => {
                    outcomes.push(BatchItemOutcome::extracted(
                        file.filename,
                        outcome.candidates,
                        outcome.from_cache,
                    ));
                }
                Err(failure) if failure.kind == ErrorKind::JobCancelled => {
                    return Err(failure);
                }
                Err(failure) => {
                    tracing::warn!(
                        filename = %file.filename,
                        kind = %failure.kind,
                        "Batch item failed"
                    );
                    outcomes.push(BatchItemOutcome::failed(file.filename, failure));
                }
            }

            done += 1;
            let pct = ((done * 100) / total.max(1)) as u8;
            progress.report(pct).await;
        }

        Ok(JobResult::Batch(outcomes))
    }

    async fn finish(&self, job_id: JobId) {
        self.cancellations.remove(job_id).await;
        self.watchers.notify_terminal(job_id).await;
    }
}
