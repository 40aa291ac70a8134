//! Error taxonomy shared by every indexer operation.
//!
//! Each variant belongs to exactly one category (input rejection, not found,
//! resource guard, internal). The HTTP layer maps categories to status codes
//! through [`IndexError::code`] and [`IndexError::kind`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("No file provided")]
    MissingUpload,

    #[error("No file selected")]
    EmptyUpload,

    #[error("Only {allowed} files are supported")]
    UnsupportedExtension { allowed: String },

    #[error("Upload too large: {size} bytes (max: {max} bytes)")]
    UploadTooLarge { size: usize, max: usize },

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("No valid files found in ZIP")]
    EmptyArchive,

    #[error("Cache expired. Please re-upload file.")]
    CacheExpired,

    #[error("No logs found for this CM process")]
    ProcessNotFound(String),

    #[error("Archive member {name} exceeds {max} bytes when decompressed")]
    MemberTooLarge { name: String, max: usize },

    #[error("File not found in archive: {0}")]
    MemberNotFound(String),

    #[error("No raw file content available")]
    NoRawContent,

    #[error("Maximum {max} lines allowed at once (requested {requested})")]
    WindowTooLarge { requested: i64, max: i64 },

    #[error("per_page must be at least 1 (got {0})")]
    InvalidPageSize(i64),

    #[error("Invalid search text: {0}")]
    InvalidSearch(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad failure category, used to pick a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    ResourceGuard,
    Internal,
}

pub type IndexResult<T> = Result<T, IndexError>;

impl IndexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IndexError::MissingUpload
            | IndexError::EmptyUpload
            | IndexError::UnsupportedExtension { .. }
            | IndexError::InvalidArchive(_)
            | IndexError::EmptyArchive
            | IndexError::InvalidPageSize(_)
            | IndexError::InvalidSearch(_) => ErrorKind::InvalidInput,
            IndexError::CacheExpired
            | IndexError::ProcessNotFound(_)
            | IndexError::MemberNotFound(_)
            | IndexError::NoRawContent => ErrorKind::NotFound,
            IndexError::UploadTooLarge { .. }
            | IndexError::MemberTooLarge { .. }
            | IndexError::WindowTooLarge { .. } => ErrorKind::ResourceGuard,
            IndexError::Export(_) | IndexError::Io(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable category code.
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::MissingUpload | IndexError::EmptyUpload => "EMPTY_UPLOAD",
            IndexError::UnsupportedExtension { .. } => "UNSUPPORTED_EXTENSION",
            IndexError::UploadTooLarge { .. } => "UPLOAD_TOO_LARGE",
            IndexError::MemberTooLarge { .. } => "MEMBER_TOO_LARGE",
            IndexError::InvalidArchive(_) => "INVALID_ARCHIVE",
            IndexError::EmptyArchive => "EMPTY_ARCHIVE",
            IndexError::CacheExpired => "CACHE_EXPIRED",
            IndexError::ProcessNotFound(_) => "PROCESS_NOT_FOUND",
            IndexError::MemberNotFound(_) => "FILE_NOT_FOUND",
            IndexError::NoRawContent => "NO_RAW_CONTENT",
            IndexError::WindowTooLarge { .. } => "WINDOW_TOO_LARGE",
            IndexError::InvalidPageSize(_) | IndexError::InvalidSearch(_) => "BAD_REQUEST",
            IndexError::Export(_) => "EXPORT_FAILED",
            IndexError::Io(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}
