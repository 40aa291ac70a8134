use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

/// Counters for ingestion and cache activity.
///
/// All operations use `Ordering::Relaxed`; `snapshot()` is not atomic across
/// fields, which is acceptable for observability counters.
#[derive(Debug, Default)]
pub struct IndexMetrics {
    archives_ingested: AtomicU64,
    archives_rejected: AtomicU64,
    members_parsed: AtomicU64,
    member_failures: AtomicU64,
    records_extracted: AtomicU64,
    unparsed_lines: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    cache_evictions: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub archives_ingested: u64,
    pub archives_rejected: u64,
    pub members_parsed: u64,
    pub member_failures: u64,
    pub records_extracted: u64,
    pub unparsed_lines: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_evictions: u64,
}

impl IndexMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_archive(&self, records: usize, unparsed_lines: usize) {
        self.archives_ingested.fetch_add(1, Ordering::Relaxed);
        self.records_extracted.fetch_add(records as u64, Ordering::Relaxed);
        self.unparsed_lines.fetch_add(unparsed_lines as u64, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.archives_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_member(&self, ok: bool) {
        if ok {
            self.members_parsed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.member_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.cache_evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            archives_ingested: self.archives_ingested.load(Ordering::Relaxed),
            archives_rejected: self.archives_rejected.load(Ordering::Relaxed),
            members_parsed: self.members_parsed.load(Ordering::Relaxed),
            member_failures: self.member_failures.load(Ordering::Relaxed),
            records_extracted: self.records_extracted.load(Ordering::Relaxed),
            unparsed_lines: self.unparsed_lines.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            cache_evictions: self.cache_evictions.load(Ordering::Relaxed),
        }
    }
}
