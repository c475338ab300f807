use async_trait::async_trait;

use crate::domain::{Candidate, Fingerprint};

/// Keyed store of finished extraction results, so re-uploads of the
/// same document are answered without re-running strategies.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &Fingerprint) -> Result<Option<Vec<Candidate>>, CacheError>;

    async fn put(&self, key: Fingerprint, candidates: Vec<Candidate>) -> Result<(), CacheError>;

    /// Drops every entry. Returns whether anything was removed.
    async fn clear_all(&self) -> Result<bool, CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend failed: {0}")]
    BackendFailed(String),
}
