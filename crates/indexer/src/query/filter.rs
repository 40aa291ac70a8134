use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};

use crate::error::{IndexError, IndexResult};
use crate::record::{Level, LogRecord};

/// Severity filter parsed from a request's level code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    Any,
    Only(Level),
    /// A code no record can carry; matches nothing.
    Unmatched,
}

impl LevelFilter {
    /// Absent or empty means no filter.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            None | Some("") => LevelFilter::Any,
            Some(code) => Level::from_code(code).map_or(LevelFilter::Unmatched, LevelFilter::Only),
        }
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            LevelFilter::Any => true,
            LevelFilter::Only(level) => record.level == *level,
            LevelFilter::Unmatched => false,
        }
    }
}

/// Case-insensitive substring search over message, flist content, and
/// source location. The needle is matched literally.
pub struct SearchFilter {
    matcher: RegexMatcher,
}

impl SearchFilter {
    /// `None` for absent or empty text, so callers can skip filtering.
    pub fn new(text: Option<&str>) -> IndexResult<Option<Self>> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(true)
            .multi_line(false)
            .build(&regex::escape(text))
            .map_err(|e| IndexError::InvalidSearch(e.to_string()))?;
        Ok(Some(Self { matcher }))
    }

    #[inline]
    fn hit(&self, haystack: &str) -> bool {
        self.matcher.is_match(haystack.as_bytes()).unwrap_or(false)
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        self.hit(&record.message)
            || self.hit(&record.flist_content)
            || self.hit(&record.source_location)
    }
}
