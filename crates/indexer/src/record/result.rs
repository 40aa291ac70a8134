//! IngestionResult: the cache entry for one archive.

use serde::Serialize;

use super::model::{LogRecord, UnparsedPreamble};
use super::summary::Summary;

/// Full decoded text of one eligible archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMember {
    pub name: String,
    pub content: String,
}

impl RawMember {
    /// Line count using the same `\n` split the raw views use.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

/// Entry of the member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberInfo {
    pub name: String,
    pub lines: usize,
}

/// Everything one ingestion produced.
///
/// Owned exclusively by the cache; request handlers only borrow it through
/// an `Arc` for the duration of one request.
#[derive(Debug, Clone)]
pub struct IngestionResult {
    /// Merged records, `sequence_number` = index + 1.
    pub records: Vec<LogRecord>,
    pub summary: Summary,
    /// Decoded text of every eligible member, in archive enumeration order.
    pub raw_files: Vec<RawMember>,
    /// Lines that matched no record, per member (members without any are omitted).
    pub unparsed: Vec<UnparsedPreamble>,
}

impl IngestionResult {
    pub fn new(
        records: Vec<LogRecord>,
        raw_files: Vec<RawMember>,
        unparsed: Vec<UnparsedPreamble>,
    ) -> Self {
        let unparsed_lines = unparsed.iter().map(|p| p.lines.len()).sum();
        let summary = Summary::from_records(&records, unparsed_lines);
        Self {
            records,
            summary,
            raw_files,
            unparsed,
        }
    }

    pub fn raw_file(&self, name: &str) -> Option<&RawMember> {
        self.raw_files.iter().find(|m| m.name == name)
    }

    pub fn members(&self) -> Vec<MemberInfo> {
        self.raw_files
            .iter()
            .map(|m| MemberInfo {
                name: m.name.clone(),
                lines: m.line_count(),
            })
            .collect()
    }

    /// Records of one process, in sequence order.
    pub fn process_records<'a>(
        &'a self,
        process_key: &'a str,
    ) -> impl Iterator<Item = &'a LogRecord> + 'a {
        self.records.iter().filter(move |r| r.process_key == process_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count_matches_newline_split() {
        let member = RawMember {
            name: "a.log".into(),
            content: "one\ntwo\n".into(),
        };
        // Trailing newline yields a final empty line.
        assert_eq!(member.line_count(), 3);

        let empty = RawMember {
            name: "b.log".into(),
            content: String::new(),
        };
        assert_eq!(empty.line_count(), 1);
    }

    #[test]
    fn test_members_keep_enumeration_order() {
        let result = IngestionResult::new(
            Vec::new(),
            vec![
                RawMember { name: "z.log".into(), content: "x".into() },
                RawMember { name: "a.log".into(), content: "x\ny".into() },
            ],
            Vec::new(),
        );
        let members = result.members();
        assert_eq!(members[0], MemberInfo { name: "z.log".into(), lines: 1 });
        assert_eq!(members[1], MemberInfo { name: "a.log".into(), lines: 2 });
        assert!(result.raw_file("a.log").is_some());
        assert!(result.raw_file("missing.log").is_none());
    }
}
