use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

use super::digest::content_digest;
use crate::conf::CacheConfig;
use crate::error::{IndexError, IndexResult};
use crate::metrics::IndexMetrics;
use crate::record::IngestionResult;

type ResultCell = Arc<OnceCell<Arc<IngestionResult>>>;

/// One cache entry. The cell is empty while the first upload of this
/// content is still being parsed; concurrent identical uploads await it.
#[derive(Debug)]
struct Slot {
    cell: ResultCell,
    created: Instant,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Slots {
    map: HashMap<String, Slot>,
    /// Logical clock for least-recently-used ordering.
    clock: u64,
}

impl Slots {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Outcome of [`ArchiveCache::get_or_create`].
#[derive(Debug, Clone)]
pub struct Cached {
    pub key: String,
    pub result: Arc<IngestionResult>,
    /// True when no parse ran for this call.
    pub from_cache: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub in_flight: usize,
}

/// Removes an in-flight slot if the upload that started its parse goes away
/// before the parse finishes, either by error or by being dropped.
struct PendingSlot<'a> {
    cache: &'a ArchiveCache,
    key: &'a str,
    cell: &'a ResultCell,
    armed: bool,
}

impl PendingSlot<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.discard(self.key, self.cell);
        }
    }
}

/// Content-addressed store of ingestion results.
///
/// A single lock guards the map. It is never held across a parse, so
/// lookups stay cheap while a large archive is being ingested.
#[derive(Debug)]
pub struct ArchiveCache {
    slots: Mutex<Slots>,
    config: CacheConfig,
    metrics: Arc<IndexMetrics>,
}

impl ArchiveCache {
    pub fn new(config: CacheConfig, metrics: Arc<IndexMetrics>) -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            config,
            metrics,
        }
    }

    fn is_expired(&self, slot: &Slot) -> bool {
        self.config
            .ttl_secs
            .is_some_and(|ttl| slot.created.elapsed() > Duration::from_secs(ttl))
    }

    /// Look up an established entry. Unknown, expired, and evicted keys
    /// are all reported as [`IndexError::CacheExpired`].
    pub fn get(&self, key: &str) -> IndexResult<Arc<IngestionResult>> {
        let mut slots = self.slots.lock();
        let tick = slots.tick();

        match slots.map.get_mut(key) {
            None => return Err(IndexError::CacheExpired),
            Some(slot) if !self.is_expired(slot) => {
                return match slot.cell.get() {
                    Some(result) => {
                        slot.last_used = tick;
                        Ok(Arc::clone(result))
                    }
                    None => Err(IndexError::CacheExpired),
                };
            }
            Some(_) => {}
        }

        slots.map.remove(key);
        debug!(key, "Dropped expired cache entry");
        Err(IndexError::CacheExpired)
    }

    /// Return the result for `bytes`, running `parse` only if no entry for
    /// this content exists or is being built. A failed parse leaves no entry.
    pub async fn get_or_create<F, Fut>(&self, bytes: Bytes, parse: F) -> IndexResult<Cached>
    where
        F: FnOnce(Bytes) -> Fut,
        Fut: Future<Output = IndexResult<IngestionResult>>,
    {
        let key = content_digest(&bytes);
        let cell = self.slot_for(&key);

        if let Some(result) = cell.get() {
            self.metrics.record_cache_hit();
            debug!(key = %key, "Cache hit");
            return Ok(Cached {
                key,
                result: Arc::clone(result),
                from_cache: true,
            });
        }

        let mut pending = PendingSlot {
            cache: self,
            key: &key,
            cell: &cell,
            armed: false,
        };
        let outcome = cell
            .get_or_try_init(|| {
                pending.armed = true;
                async move { parse(bytes).await.map(Arc::new) }
            })
            .await
            .map(Arc::clone);

        let parsed_here = pending.armed;
        let result = outcome?;
        pending.disarm();

        if parsed_here {
            self.metrics.record_cache_miss();
        } else {
            self.metrics.record_cache_hit();
        }
        self.settle(&key, &cell);

        Ok(Cached {
            key,
            result,
            from_cache: !parsed_here,
        })
    }

    /// Fetch the cell for `key`, creating an empty slot if none is live.
    fn slot_for(&self, key: &str) -> ResultCell {
        let mut slots = self.slots.lock();
        let tick = slots.tick();

        if let Some(slot) = slots.map.get_mut(key) {
            if !self.is_expired(slot) {
                slot.last_used = tick;
                return Arc::clone(&slot.cell);
            }
        }

        let cell: ResultCell = Arc::new(OnceCell::new());
        slots.map.insert(
            key.to_string(),
            Slot {
                cell: Arc::clone(&cell),
                created: Instant::now(),
                last_used: tick,
            },
        );
        cell
    }

    /// Remove the slot after a failed parse, unless someone already replaced
    /// or completed it.
    fn discard(&self, key: &str, cell: &ResultCell) {
        let mut slots = self.slots.lock();
        let stale = slots
            .map
            .get(key)
            .is_some_and(|slot| Arc::ptr_eq(&slot.cell, cell) && !slot.cell.initialized());
        if stale {
            slots.map.remove(key);
        }
    }

    /// Make sure a completed cell is reachable under `key`, then apply the
    /// entry bound.
    fn settle(&self, key: &str, cell: &ResultCell) {
        let mut slots = self.slots.lock();
        let tick = slots.tick();

        match slots.map.get_mut(key) {
            Some(slot) if Arc::ptr_eq(&slot.cell, cell) || slot.cell.initialized() => {
                slot.last_used = tick;
            }
            _ => {
                slots.map.insert(
                    key.to_string(),
                    Slot {
                        cell: Arc::clone(cell),
                        created: Instant::now(),
                        last_used: tick,
                    },
                );
            }
        }

        let Some(max) = self.config.max_entries else {
            return;
        };
        // In-flight slots hold no result and do not count against the bound.
        let mut live = slots
            .map
            .values()
            .filter(|slot| slot.cell.initialized())
            .count();
        while live > max {
            let victim = slots
                .map
                .iter()
                .filter(|(k, slot)| k.as_str() != key && slot.cell.initialized())
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(k, _)| k.clone());
            let Some(victim) = victim else {
                break;
            };
            slots.map.remove(&victim);
            live -= 1;
            self.metrics.record_eviction();
            debug!(key = %victim, "Evicted least recently used cache entry");
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let slots = self.slots.lock();
        let in_flight = slots
            .map
            .values()
            .filter(|slot| !slot.cell.initialized())
            .count();
        CacheStats {
            entries: slots.map.len() - in_flight,
            in_flight,
        }
    }
}
