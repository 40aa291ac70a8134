use std::collections::HashMap;

use serde::Serialize;

use crate::record::IngestionResult;

/// Inclusive bounds on `sequence_number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRange {
    pub from: i64,
    pub to: i64,
}

impl Default for SequenceRange {
    fn default() -> Self {
        Self {
            from: 0,
            to: 999_999_999,
        }
    }
}

impl SequenceRange {
    pub fn new(from: Option<i64>, to: Option<i64>) -> Self {
        let default = Self::default();
        Self {
            from: from.unwrap_or(default.from),
            to: to.unwrap_or(default.to),
        }
    }

    pub fn contains(&self, sequence_number: u64) -> bool {
        let n = sequence_number as i64;
        self.from <= n && n <= self.to
    }
}

/// One distinct error of a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueError {
    pub message: String,
    #[serde(rename = "sourceFile")]
    pub source_location: String,
    pub count: usize,
    /// Sequence number of the first occurrence.
    pub first_line: u64,
}

/// Group Error-level records of `process` by (message, source location),
/// ordered by first occurrence.
pub fn unique_errors(
    result: &IngestionResult,
    process: &str,
    range: SequenceRange,
) -> Vec<UniqueError> {
    let mut groups: Vec<UniqueError> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for record in result.process_records(process) {
        if !record.is_error() || !range.contains(record.sequence_number) {
            continue;
        }
        let key = (record.message.as_str(), record.source_location.as_str());
        match index.get(&key) {
            Some(&pos) => groups[pos].count += 1,
            None => {
                index.insert(key, groups.len());
                groups.push(UniqueError {
                    message: record.message.clone(),
                    source_location: record.source_location.clone(),
                    count: 1,
                    first_line: record.sequence_number,
                });
            }
        }
    }

    groups
}
