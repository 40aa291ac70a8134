// Domain-driven module structure for the CM log indexer.

// Core infrastructure
pub mod conf;
pub mod error;
pub mod metrics;
pub mod record;
pub mod state;

// Domain modules
pub mod extract;
pub mod ingest;
pub mod cache;
pub mod query;
pub mod rebuild;

pub use error::{IndexError, IndexResult};
pub use record::{IngestionResult, Level, LogRecord, Summary};
pub use state::{IndexerState, SharedState};
