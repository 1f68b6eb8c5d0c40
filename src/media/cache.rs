use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;

use crate::{media::VideoMetadata, sources::youtube::VideoId};

struct CacheEntry {
    metadata: Arc<VideoMetadata>,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.stored_at.elapsed() >= ttl)
    }
}

/// Selected-format lists keyed by video id.
///
/// Concurrent misses for the same id are not coalesced: each caller fetches
/// and the last insert wins. Entries live for the process unless a TTL is set.
pub struct MetadataCache {
    entries: DashMap<VideoId, CacheEntry>,
    ttl: Option<Duration>,
}

impl MetadataCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, video_id: &VideoId) -> Option<Arc<VideoMetadata>> {
        {
            let entry = self.entries.get(video_id)?;
            if !entry.is_expired(self.ttl) {
                return Some(entry.metadata.clone());
            }
        }

        self.entries
            .remove_if(video_id, |_, entry| entry.is_expired(self.ttl));
        tracing::debug!("Metadata cache entry for {} expired", video_id);
        None
    }

    pub fn insert(&self, video_id: VideoId, metadata: VideoMetadata) -> Arc<VideoMetadata> {
        let metadata = Arc::new(metadata);
        self.entries.insert(
            video_id,
            CacheEntry {
                metadata: metadata.clone(),
                stored_at: Instant::now(),
            },
        );
        metadata
    }

    /// Returns the cached entry, or runs `fetch` and stores its result.
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        video_id: &VideoId,
        fetch: F,
    ) -> Result<Arc<VideoMetadata>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<VideoMetadata, E>>,
    {
        if let Some(hit) = self.get(video_id) {
            tracing::debug!("Metadata cache hit for {}", video_id);
            return Ok(hit);
        }

        let metadata = fetch().await?;
        Ok(self.insert(video_id.clone(), metadata))
    }

    /// Drops the entry for `video_id`, returning whether one existed.
    pub fn invalidate(&self, video_id: &VideoId) -> bool {
        self.entries.remove(video_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(None)
    }
}
