mod confidence_scorer;
mod document_profiler;
mod extraction_pipeline;
mod extraction_worker;
mod job_orchestrator;
mod normalize;
mod result_merger;
mod retention_sweeper;
mod routing_policy;

pub use confidence_scorer::ConfidenceScorer;
pub use document_profiler::DocumentProfiler;
pub use extraction_pipeline::{ExtractionOutcome, ExtractionPipeline};
pub use extraction_worker::{ExtractionWorker, SharedQueue};
pub use job_orchestrator::{
    BatchFile, BatchPayload, CancelOutcome, CancellationRegistry, JobMessage, JobOrchestrator,
    JobPayload, JobWatchers, SinglePayload, SubmitError,
};
pub use result_merger::ResultMerger;
pub use retention_sweeper::RetentionSweeper;
pub use routing_policy::{RoutingError, RoutingPolicy, RoutingRules};
