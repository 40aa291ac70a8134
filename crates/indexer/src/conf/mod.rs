//! Conf module: ingestion, cache, and query configuration model.

pub mod model;

pub use model::{CacheConfig, IndexerConfig, IngestConfig, QueryConfig};
