use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ExtractionFailure, ExtractionJob, JobId, JobResult};

/// Persistence for extraction jobs.
///
/// Implementations enforce two rules: a job in a terminal state never
/// changes again, and progress never moves backwards.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, job: &ExtractionJob) -> Result<(), JobStoreError>;

    async fn get(&self, id: JobId) -> Result<Option<ExtractionJob>, JobStoreError>;

    async fn mark_running(&self, id: JobId) -> Result<(), JobStoreError>;

    async fn set_progress(&self, id: JobId, pct: u8) -> Result<(), JobStoreError>;

    async fn complete(&self, id: JobId, result: JobResult) -> Result<(), JobStoreError>;

    async fn fail(&self, id: JobId, failure: ExtractionFailure) -> Result<(), JobStoreError>;

    async fn delete(&self, id: JobId) -> Result<bool, JobStoreError>;

    /// Removes terminal jobs that finished before the cutoff. Returns
    /// how many were swept.
    async fn sweep_finished_before(&self, cutoff: DateTime<Utc>) -> Result<usize, JobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum JobStoreError {
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("job already terminal: {0}")]
    AlreadyTerminal(String),
    #[error("storage failed: {0}")]
    StorageFailed(String),
}
