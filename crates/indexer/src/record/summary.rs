//! Summary: per-process and global record counts for one ingestion.

use std::collections::HashMap;
use serde::Serialize;

use super::model::{Level, LogRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_logs: usize,
    pub total_processes: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_debugs: usize,
    /// Lines dropped before the first header of each member.
    pub unparsed_lines: usize,
    /// One entry per process key, in order of first appearance.
    pub processes: Vec<ProcessSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummary {
    pub process: String,
    pub process_name: String,
    pub process_pid: String,
    pub errors: usize,
    pub warnings: usize,
    pub debugs: usize,
    pub total: usize,
}

impl ProcessSummary {
    fn count(&mut self, level: Level) {
        self.total += 1;
        match level {
            Level::Error => self.errors += 1,
            Level::Warning => self.warnings += 1,
            Level::Debug => self.debugs += 1,
        }
    }
}

impl Summary {
    pub fn from_records(records: &[LogRecord], unparsed_lines: usize) -> Self {
        let mut summary = Summary {
            total_logs: records.len(),
            unparsed_lines,
            ..Default::default()
        };

        // process_key → index into summary.processes
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in records {
            match record.level {
                Level::Error => summary.total_errors += 1,
                Level::Warning => summary.total_warnings += 1,
                Level::Debug => summary.total_debugs += 1,
            }

            let idx = *positions.entry(record.process_key.as_str()).or_insert_with(|| {
                summary.processes.push(ProcessSummary {
                    process: record.process_key.clone(),
                    process_name: record.process_name.clone(),
                    process_pid: record.process_pid.clone(),
                    ..Default::default()
                });
                summary.processes.len() - 1
            });
            summary.processes[idx].count(record.level);
        }

        summary.total_processes = summary.processes.len();
        summary
    }

    pub fn process(&self, process_key: &str) -> Option<&ProcessSummary> {
        self.processes.iter().find(|p| p.process == process_key)
    }
}
