pub mod contact;
pub mod document_profile;
pub mod error_kind;
pub mod extraction_options;
pub mod fingerprint;
pub mod job;
pub mod job_status;
pub mod mime;
pub mod strategy;

pub use contact::{Candidate, RawContact};
pub use document_profile::{DocumentProfile, DocumentType, ProductionCategory};
pub use error_kind::{ErrorKind, ExtractionFailure};
pub use extraction_options::{ExtractionOptions, JobPriority};
pub use fingerprint::Fingerprint;
pub use job::{BatchItemOutcome, ExtractionJob, JobId, JobKind, JobResult};
pub use job_status::JobStatus;
pub use mime::MimeKind;
pub use strategy::{ExecutionPlan, StrategyKind};
