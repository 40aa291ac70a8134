use std::sync::Arc;

use bytes::Bytes;

use crate::cache::{ArchiveCache, CacheStats, Cached};
use crate::conf::IndexerConfig;
use crate::error::IndexResult;
use crate::ingest::Ingestor;
use crate::metrics::{IndexMetrics, MetricsSnapshot};
use crate::rebuild::{raw_window, RawWindow, WindowRequest};
use crate::record::IngestionResult;

/// Process-wide indexer state: one ingestor, one cache, shared counters.
pub struct IndexerState {
    pub config: IndexerConfig,
    pub ingestor: Ingestor,
    pub cache: ArchiveCache,
    pub metrics: Arc<IndexMetrics>,
}

impl IndexerState {
    pub fn new(config: IndexerConfig) -> Self {
        let metrics = Arc::new(IndexMetrics::new());
        Self {
            ingestor: Ingestor::new(config.ingest.clone(), Arc::clone(&metrics)),
            cache: ArchiveCache::new(config.cache.clone(), Arc::clone(&metrics)),
            config,
            metrics,
        }
    }

    /// Validate an upload, then parse it unless identical content is
    /// already cached or being parsed.
    pub async fn ingest_upload(&self, file_name: &str, bytes: Bytes) -> IndexResult<Cached> {
        if let Err(e) = self.ingestor.check_upload(file_name, bytes.len()) {
            self.metrics.record_rejected();
            return Err(e);
        }
        self.cache
            .get_or_create(bytes, |bytes| self.ingestor.ingest(bytes))
            .await
    }

    pub fn lookup(&self, key: &str) -> IndexResult<Arc<IngestionResult>> {
        self.cache.get(key)
    }

    /// The size guard runs before the cache is consulted.
    pub fn raw_window(&self, key: &str, request: &WindowRequest) -> IndexResult<RawWindow> {
        request.validate(self.config.query.max_window_lines)?;
        let result = self.lookup(key)?;
        raw_window(&result, request)
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

pub type SharedState = Arc<IndexerState>;
