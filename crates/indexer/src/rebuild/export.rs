use std::collections::HashMap;
use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::process::render_records;
use crate::error::{IndexError, IndexResult};
use crate::record::{IngestionResult, LogRecord};

/// Download name for an export produced at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("brm_cm_logs_{}.zip", now.timestamp())
}

/// Entry name for one process inside the export.
pub fn entry_name(record: &LogRecord) -> String {
    format!("{}_{}.log", record.process_name, record.process_pid)
}

/// Build a deflate-compressed archive with one reconstructed log per
/// process, entries in order of first appearance.
pub fn export_archive(result: &IngestionResult) -> IndexResult<Vec<u8>> {
    let mut order: Vec<Vec<&LogRecord>> = Vec::new();
    let mut by_process: HashMap<&str, usize> = HashMap::new();
    for record in &result.records {
        match by_process.get(record.process_key.as_str()) {
            Some(&pos) => order[pos].push(record),
            None => {
                by_process.insert(record.process_key.as_str(), order.len());
                order.push(vec![record]);
            }
        }
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for records in &order {
        let name = entry_name(records[0]);
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| IndexError::Export(e.to_string()))?;
        writer.write_all(render_records(records.iter().copied()).as_bytes())?;
    }

    let buf = writer
        .finish()
        .map_err(|e| IndexError::Export(e.to_string()))?
        .into_inner();
    debug!(entries = order.len(), bytes = buf.len(), "Built export archive");
    Ok(buf)
}
