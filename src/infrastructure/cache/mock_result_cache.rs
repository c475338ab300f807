use async_trait::async_trait;

use crate::application::ports::{CacheError, ResultCache};
use crate::domain::{Candidate, Fingerprint};

/// Cache stand-in whose lookups and writes always fail, for exercising
/// the paths that must survive a broken cache backend.
pub struct BrokenResultCache;

#[async_trait]
impl ResultCache for BrokenResultCache {
    async fn get(&self, _key: &Fingerprint) -> Result<Option<Vec<Candidate>>, CacheError> {
        Err(CacheError::BackendFailed("cache is down".to_string()))
    }

    async fn put(&self, _key: Fingerprint, _candidates: Vec<Candidate>) -> Result<(), CacheError> {
        Err(CacheError::BackendFailed("cache is down".to_string()))
    }

    async fn clear_all(&self) -> Result<bool, CacheError> {
        Err(CacheError::BackendFailed("cache is down".to_string()))
    }
}
