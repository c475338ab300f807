use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{CacheError, ResultCache};
use crate::domain::{Candidate, Fingerprint};

struct CacheEntry {
    candidates: Vec<Candidate>,
    stored_at: Instant,
    last_accessed: Instant,
    hit_count: u64,
}

/// Bounded in-memory result cache. Entries expire a fixed TTL after
/// they were stored; when the cache is full the least recently used
/// entry makes room. Hits only bump the entry's counter and access
/// time, the candidates themselves are never rewritten.
pub struct MemoryResultCache {
    entries: RwLock<HashMap<Fingerprint, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl MemoryResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
            ttl,
        }
    }
}

#[async_trait]
impl ResultCache for MemoryResultCache {
    async fn get(&self, key: &Fingerprint) -> Result<Option<Vec<Candidate>>, CacheError> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                entry.hit_count += 1;
                entry.last_accessed = Instant::now();
                tracing::debug!(fingerprint = %key, hits = entry.hit_count, "Cache hit");
                Ok(Some(entry.candidates.clone()))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: Fingerprint, candidates: Vec<Candidate>) -> Result<(), CacheError> {
        if self.capacity == 0 {
            return Ok(());
        }

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let stale = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_accessed)
                .map(|(key, _)| key.clone());
            if let Some(stale) = stale {
                entries.remove(&stale);
            }
        }

        let now = Instant::now();
        entries.insert(
            key,
            CacheEntry {
                candidates,
                stored_at: now,
                last_accessed: now,
                hit_count: 0,
            },
        );
        Ok(())
    }

    async fn clear_all(&self) -> Result<bool, CacheError> {
        let mut entries = self.entries.write().await;
        let had_entries = !entries.is_empty();
        entries.clear();
        Ok(had_entries)
    }
}
