//! Ingestor: archive upload → one merged [`IngestionResult`].
//!
//! Members are read, decoded, and extracted on the bounded [`WorkerPool`].
//! Outputs are merged in archive enumeration order and numbered 1..N. A
//! member that fails (read error or worker panic) contributes nothing and
//! is logged; it never aborts the ingestion.

pub mod archive;
pub mod pool;

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::conf::IngestConfig;
use crate::error::{IndexError, IndexResult};
use crate::extract::{extract, Extraction};
use crate::metrics::IndexMetrics;
use crate::record::{IngestionResult, RawMember, UnparsedPreamble};

pub use archive::{is_eligible, Archive, MemberRef};
pub use pool::{JobError, WorkerPool};

/// What one worker produces for one member.
#[derive(Debug)]
struct MemberOutput {
    text: String,
    extraction: Extraction,
}

pub struct Ingestor {
    config: IngestConfig,
    pool: WorkerPool,
    metrics: Arc<IndexMetrics>,
}

impl Ingestor {
    pub fn new(config: IngestConfig, metrics: Arc<IndexMetrics>) -> Self {
        let pool = WorkerPool::new(config.worker_count);
        Self {
            config,
            pool,
            metrics,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Reject uploads that cannot be an accepted archive before any parsing.
    pub fn check_upload(&self, file_name: &str, size: usize) -> IndexResult<()> {
        if file_name.trim().is_empty() {
            return Err(IndexError::EmptyUpload);
        }
        if !self.config.accepts(file_name) {
            return Err(IndexError::UnsupportedExtension {
                allowed: self.config.allowed_extensions.join(", ").to_uppercase(),
            });
        }
        if size > self.config.max_upload_bytes {
            return Err(IndexError::UploadTooLarge {
                size,
                max: self.config.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// Parse an archive into a merged, numbered result.
    pub async fn ingest(&self, bytes: Bytes) -> IndexResult<IngestionResult> {
        let archive = match Archive::open(bytes) {
            Ok(archive) => archive,
            Err(e) => {
                self.metrics.record_rejected();
                return Err(e);
            }
        };
        let members = archive.members().to_vec();
        debug!(
            members = members.len(),
            workers = self.pool.width(),
            "Extracting archive members"
        );

        let max_member_bytes = self.config.max_member_bytes;
        let jobs: Vec<_> = members
            .iter()
            .map(|member| {
                let mut reader = archive.clone();
                let member = member.clone();
                move || -> IndexResult<MemberOutput> {
                    let text = reader.read_text(&member, max_member_bytes)?;
                    let extraction = extract(&text, &member.name);
                    Ok(MemberOutput { text, extraction })
                }
            })
            .collect();

        let outcomes = self.pool.run_ordered(jobs).await;

        let mut records = Vec::new();
        let mut raw_files = Vec::with_capacity(members.len());
        let mut unparsed = Vec::new();

        for (member, outcome) in members.into_iter().zip(outcomes) {
            let output = match outcome {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => {
                    warn!(member = %member.name, error = %e, "Failed to read archive member");
                    self.metrics.record_member(false);
                    continue;
                }
                Err(e) => {
                    warn!(member = %member.name, error = %e, "Extraction worker failed");
                    self.metrics.record_member(false);
                    continue;
                }
            };
            self.metrics.record_member(true);

            let MemberOutput { text, extraction } = output;
            records.extend(extraction.records);
            if !extraction.preamble.is_empty() {
                unparsed.push(UnparsedPreamble {
                    file: member.name.clone(),
                    lines: extraction.preamble,
                });
            }
            raw_files.push(RawMember {
                name: member.name,
                content: text,
            });
        }

        for (idx, record) in records.iter_mut().enumerate() {
            record.sequence_number = idx as u64 + 1;
        }

        let result = IngestionResult::new(records, raw_files, unparsed);
        self.metrics
            .record_archive(result.records.len(), result.summary.unparsed_lines);
        info!(
            records = result.summary.total_logs,
            processes = result.summary.total_processes,
            members = result.raw_files.len(),
            "Archive ingested"
        );
        Ok(result)
    }
}
