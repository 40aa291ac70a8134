use serde::Serialize;

use super::filter::{LevelFilter, SearchFilter};
use crate::error::{IndexError, IndexResult};
use crate::record::{IngestionResult, LogRecord};

/// One page of a filtered sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    #[serde(rename = "logs")]
    pub items: Vec<T>,
    pub total: usize,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: usize,
}

/// Slice out page `page` (1-based). Pages below 1 or past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: i64, per_page: i64) -> IndexResult<Page<T>> {
    if per_page < 1 {
        return Err(IndexError::InvalidPageSize(per_page));
    }
    let total = items.len();
    let size = per_page as usize;

    let slice = if page < 1 {
        &items[..0]
    } else {
        let start = ((page - 1) as usize).saturating_mul(size).min(total);
        let end = start.saturating_add(size).min(total);
        &items[start..end]
    };

    Ok(Page {
        items: slice.to_vec(),
        total,
        page,
        per_page,
        total_pages: total.div_ceil(size),
    })
}

/// Filtered, paginated view of one process's records.
pub struct ProcessQuery {
    pub process: String,
    pub level: LevelFilter,
    pub search: Option<SearchFilter>,
    pub page: i64,
    pub per_page: i64,
}

impl ProcessQuery {
    pub fn new(
        process: impl Into<String>,
        level: Option<&str>,
        search: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> IndexResult<Self> {
        if per_page < 1 {
            return Err(IndexError::InvalidPageSize(per_page));
        }
        Ok(Self {
            process: process.into(),
            level: LevelFilter::from_code(level),
            search: SearchFilter::new(search)?,
            page,
            per_page,
        })
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        record.process_key == self.process
            && self.level.matches(record)
            && self.search.as_ref().map_or(true, |s| s.matches(record))
    }

    /// Records keep their merged sequence order.
    pub fn run(&self, result: &IngestionResult) -> IndexResult<Page<LogRecord>> {
        let hits: Vec<&LogRecord> = result.records.iter().filter(|r| self.matches(r)).collect();
        let page = paginate(&hits, self.page, self.per_page)?;
        Ok(Page {
            items: page.items.into_iter().cloned().collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        })
    }
}
