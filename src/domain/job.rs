use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contact::Candidate;
use crate::domain::error_kind::ExtractionFailure;
use crate::domain::extraction_options::JobPriority;
use crate::domain::job_status::JobStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    Single { filename: String },
    Batch { file_count: usize },
}

impl JobKind {
    pub fn describe(&self) -> String {
        match self {
            JobKind::Single { filename } => filename.clone(),
            JobKind::Batch { file_count } => format!("batch of {}", file_count),
        }
    }
}

/// Outcome of one file inside a batch job. Failures are carried per
/// item so one bad file never sinks its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemOutcome {
    pub filename: String,
    pub candidates: Vec<Candidate>,
    pub from_cache: bool,
    pub error: Option<ExtractionFailure>,
}

impl BatchItemOutcome {
    pub fn extracted(filename: impl Into<String>, candidates: Vec<Candidate>, from_cache: bool) -> Self {
        Self {
            filename: filename.into(),
            candidates,
            from_cache,
            error: None,
        }
    }

    pub fn failed(filename: impl Into<String>, error: ExtractionFailure) -> Self {
        Self {
            filename: filename.into(),
            candidates: Vec::new(),
            from_cache: false,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
    Contacts {
        candidates: Vec<Candidate>,
        from_cache: bool,
    },
    Batch(Vec<BatchItemOutcome>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionJob {
    pub id: JobId,
    pub kind: JobKind,
    pub priority: JobPriority,
    pub status: JobStatus,
    pub progress: u8,
    pub result: Option<JobResult>,
    pub error: Option<ExtractionFailure>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExtractionJob {
    pub fn new(kind: JobKind, priority: JobPriority) -> Self {
        Self {
            id: JobId::new(),
            kind,
            priority,
            status: JobStatus::Queued,
            progress: 0,
            result: None,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Progress only ever moves forward. Out-of-order updates from
    /// concurrent reporters are dropped rather than rewound.
    pub fn advance_progress(&mut self, pct: u8) {
        let pct = pct.min(100);
        if pct > self.progress {
            self.progress = pct;
        }
    }

    pub fn complete(&mut self, result: JobResult) {
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.result = Some(result);
        self.finished_at = Some(Utc::now());
    }

    pub fn fail(&mut self, failure: ExtractionFailure) {
        self.status = JobStatus::Failed;
        self.error = Some(failure);
        self.finished_at = Some(Utc::now());
    }
}
