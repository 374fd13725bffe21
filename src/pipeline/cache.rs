use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{TicketTable, UploadFingerprint, UploadedFile};

/// Manages caching of parsed upload sets
pub struct IngestCache {
    cache: LruCache<UploadFingerprint, Arc<TicketTable>>,
}

impl IngestCache {
    /// Create a cache holding up to `capacity` upload sets (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Store a parsed table
    pub fn store(&mut self, key: UploadFingerprint, table: Arc<TicketTable>) {
        self.cache.put(key, table);
    }

    /// Retrieve a parsed table, marking it most recently used
    pub fn get(&mut self, key: &UploadFingerprint) -> Option<Arc<TicketTable>> {
        self.cache.get(key).cloned()
    }

    /// Return the cached table for `files`, parsing them with `load` on a miss.
    /// Failed loads are not cached.
    pub fn get_or_load<F>(&mut self, files: &[UploadedFile], load: F) -> Result<Arc<TicketTable>>
    where
        F: FnOnce(&[UploadedFile]) -> Result<TicketTable>,
    {
        let key = UploadFingerprint::of(files);
        if let Some(table) = self.get(&key) {
            log::debug!("Upload set {:016x} served from cache", key.digest());
            return Ok(table);
        }

        let table = Arc::new(load(files)?);
        self.store(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for IngestCache {
    fn default() -> Self {
        Self::new(8)
    }
}
