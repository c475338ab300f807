use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DocumentProfile, ErrorKind, ExtractionOptions, RawContact, StrategyKind};

/// One extraction strategy. Implementations must be safe to run
/// concurrently against the same text.
#[async_trait]
pub trait ContactExtractor: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn extract(
        &self,
        text: &str,
        profile: &DocumentProfile,
        options: &ExtractionOptions,
    ) -> Result<Vec<RawContact>, ExtractorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("strategy timed out after {0}s")]
    Timeout(u64),
    #[error("strategy unavailable: {0}")]
    Unavailable(String),
    #[error("strategy failed: {0}")]
    Failed(String),
}

impl ExtractorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractorError::Timeout(_) => ErrorKind::StrategyTimeout,
            ExtractorError::Unavailable(_) => ErrorKind::StrategyUnavailable,
            ExtractorError::Failed(_) => ErrorKind::InternalError,
        }
    }
}

/// Lookup table from plan entries to the extractors that execute them.
#[derive(Clone)]
pub struct StrategySet {
    pattern: Arc<dyn ContactExtractor>,
    model: Arc<dyn ContactExtractor>,
}

impl StrategySet {
    pub fn new(pattern: Arc<dyn ContactExtractor>, model: Arc<dyn ContactExtractor>) -> Self {
        Self { pattern, model }
    }

    pub fn get(&self, kind: StrategyKind) -> Arc<dyn ContactExtractor> {
        match kind {
            StrategyKind::Pattern => Arc::clone(&self.pattern),
            StrategyKind::Model => Arc::clone(&self.model),
        }
    }
}
