//! Content-addressed cache of ingestion results.

pub mod digest;
pub mod store;

pub use digest::content_digest;
pub use store::{ArchiveCache, CacheStats, Cached};
