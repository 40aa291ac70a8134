//! Model: IndexerConfig and its sections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub ingest: IngestConfig,
    pub cache: CacheConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Width of the extraction worker pool, independent of archive size.
    pub worker_count: usize,
    /// Accepted upload file extensions, without the dot.
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
    /// Cap on one member's decompressed size; larger members fail alone.
    pub max_member_bytes: usize,
}

/// Cache bounds. `None` keeps an entry for the life of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Least-recently-used bound on the number of cached archives.
    pub max_entries: Option<usize>,
    /// Entries older than this are treated as absent.
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_page_size: i64,
    /// Hard cap on `to_line - from_line` for raw windows.
    pub max_window_lines: i64,
    /// Window size used when `to_line` is not given.
    pub default_window_lines: i64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            allowed_extensions: vec!["zip".to_string()],
            max_upload_bytes: 500 * 1024 * 1024,
            max_member_bytes: 1024 * 1024 * 1024,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            max_window_lines: 5000,
            default_window_lines: 100,
        }
    }
}

impl IndexerConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.ingest.validate()?;
        self.cache.validate()?;
        self.query.validate()
    }
}

impl IngestConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("ingest.worker_count must be > 0".to_string());
        }
        if self.allowed_extensions.is_empty() {
            return Err("ingest.allowed_extensions must not be empty".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("ingest.max_upload_bytes must be > 0".to_string());
        }
        if self.max_member_bytes == 0 {
            return Err("ingest.max_member_bytes must be > 0".to_string());
        }
        Ok(())
    }

    /// Case-insensitive extension check on an upload file name.
    pub fn accepts(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.allowed_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext.to_ascii_lowercase())))
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == Some(0) {
            return Err("cache.max_entries must be > 0 when set".to_string());
        }
        if self.ttl_secs == Some(0) {
            return Err("cache.ttl_secs must be > 0 when set".to_string());
        }
        Ok(())
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.default_page_size < 1 {
            return Err("query.default_page_size must be >= 1".to_string());
        }
        if self.max_window_lines < 1 {
            return Err("query.max_window_lines must be >= 1".to_string());
        }
        if self.default_window_lines < 1 || self.default_window_lines > self.max_window_lines {
            return Err(
                "query.default_window_lines must be between 1 and max_window_lines".to_string(),
            );
        }
        Ok(())
    }
}
