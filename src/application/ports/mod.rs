mod contact_extractor;
mod document_ingest;
mod job_store;
mod progress_sink;
mod result_cache;

pub use contact_extractor::{ContactExtractor, ExtractorError, StrategySet};
pub use document_ingest::{DocumentIngest, IngestError};
pub use job_store::{JobStore, JobStoreError};
pub use progress_sink::{NoopProgress, ProgressSink};
pub use result_cache::{CacheError, ResultCache};
