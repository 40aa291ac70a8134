//! Record module: the structured log record, ingestion summary, and the
//! cached ingestion result that owns both.

pub mod model;
pub mod summary;
pub mod result;

pub use model::{split_process_key, Level, LogRecord, UnparsedLine, UnparsedPreamble};
pub use result::{IngestionResult, MemberInfo, RawMember};
pub use summary::{ProcessSummary, Summary};
