//! Read-only queries over a cached ingestion result.

pub mod errors;
pub mod filter;
pub mod page;

pub use errors::{unique_errors, SequenceRange, UniqueError};
pub use filter::{LevelFilter, SearchFilter};
pub use page::{paginate, Page, ProcessQuery};
