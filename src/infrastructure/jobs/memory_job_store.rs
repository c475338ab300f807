use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::{JobStore, JobStoreError};
use crate::domain::{ExtractionFailure, ExtractionJob, JobId, JobResult};

/// In-memory job store. Terminal jobs are frozen and progress is
/// monotonic, whatever order concurrent updates land in.
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobId, ExtractionJob>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job: &ExtractionJob) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(JobStoreError::StorageFailed(format!(
                "duplicate job id {}",
                job.id.as_uuid()
            )));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Option<ExtractionJob>, JobStoreError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn mark_running(&self, id: JobId) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| JobStoreError::NotFound(id.as_uuid().to_string()))?;
        if job.status.is_terminal() {
            return Err(JobStoreError::AlreadyTerminal(id.as_uuid().to_string()));
        }
        job.mark_running();
        Ok(())
    }

    async fn set_progress(&self, id: JobId, pct: u8) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| JobStoreError::NotFound(id.as_uuid().to_string()))?;
        if job.status.is_terminal() {
            return Err(JobStoreError::AlreadyTerminal(id.as_uuid().to_string()));
        }
        job.advance_progress(pct);
        Ok(())
    }

    async fn complete(&self, id: JobId, result: JobResult) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| JobStoreError::NotFound(id.as_uuid().to_string()))?;
        if job.status.is_terminal() {
            return Err(JobStoreError::AlreadyTerminal(id.as_uuid().to_string()));
        }
        job.complete(result);
        Ok(())
    }

    async fn fail(&self, id: JobId, failure: ExtractionFailure) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| JobStoreError::NotFound(id.as_uuid().to_string()))?;
        if job.status.is_terminal() {
            return Err(JobStoreError::AlreadyTerminal(id.as_uuid().to_string()));
        }
        job.fail(failure);
        Ok(())
    }

    async fn delete(&self, id: JobId) -> Result<bool, JobStoreError> {
        Ok(self.jobs.write().await.remove(&id).is_some())
    }

    async fn sweep_finished_before(&self, cutoff: DateTime<Utc>) -> Result<usize, JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| {
            !(job.status.is_terminal()
                && job.finished_at.map(|at| at < cutoff).unwrap_or(false))
        });
        Ok(before - jobs.len())
    }
}
