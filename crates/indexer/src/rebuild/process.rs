use serde::Serialize;

use crate::error::{IndexError, IndexResult};
use crate::record::{IngestionResult, LogRecord};

/// Indentation applied to messages in reconstructed text.
const MESSAGE_INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessText {
    #[serde(rename = "rawText")]
    pub raw_text: String,
    #[serde(rename = "totalLogs")]
    pub total_logs: usize,
    #[serde(rename = "processName")]
    pub process_name: String,
}

/// Reconstruct log text from records: header, indented message, flist
/// content, then a blank separator line per record.
pub fn render_records<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> String {
    let mut lines: Vec<String> = Vec::new();
    for record in records {
        lines.push(record.raw_header.clone());
        if record.has_message() {
            lines.push(format!("{MESSAGE_INDENT}{}", record.message));
        }
        if !record.flist_content.is_empty() {
            lines.push(record.flist_content.clone());
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Text of every record of one process, in sequence order.
pub fn process_text(result: &IngestionResult, process: &str) -> IndexResult<ProcessText> {
    let records: Vec<&LogRecord> = result.process_records(process).collect();
    let Some(first) = records.first() else {
        return Err(IndexError::ProcessNotFound(process.to_string()));
    };
    let process_name = first.process_name.clone();

    Ok(ProcessText {
        raw_text: render_records(records.iter().copied()),
        total_logs: records.len(),
        process_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;

    const H1: &str = "E Mon Jan 1 00:00:00 2024 host1 cm:7 a.c:1 t";
    const H2: &str = "D Mon Jan 1 00:00:01 2024 host1 cm:7 b.c:2 t";

    #[test]
    fn test_render_shape() {
        let text = format!("{H1}\nmsg one\n  flist a\n  flist b\n{H2}\n\n  tail");
        let records = extract(&text, "cm.log").records;
        let rendered = render_records(&records);
        assert_eq!(
            rendered,
            format!("{H1}\n    msg one\n  flist a\n  flist b\n\n{H2}\n\n  tail\n")
        );
    }

    #[test]
    fn test_rendered_text_re_extracts_to_same_records() {
        let text = format!("{H1}\nmsg one\n  flist a\n  flist b\n{H2}\nmsg two");
        let records = extract(&text, "cm.log").records;
        let again = extract(&render_records(&records), "cm.log").records;

        assert_eq!(records[0].flist_content, "  flist a\n  flist b");
        assert_eq!(again.len(), records.len());
        for (a, b) in records.iter().zip(&again) {
            assert_eq!(a.raw_header, b.raw_header);
            assert_eq!(a.level, b.level);
            assert_eq!(a.process_key, b.process_key);
            assert_eq!(a.source_location, b.source_location);
            assert_eq!(a.message, b.message);
            // The blank separator line comes back as trailing flist spacing.
            assert_eq!(
                a.flist_content.trim_end_matches('\n'),
                b.flist_content.trim_end_matches('\n')
            );
        }
    }

    #[test]
    fn test_process_text_counts_and_name() {
        let text = format!("{H1}\nmsg one\n{H2}\nmsg two");
        let records = extract(&text, "cm.log").records;
        let result = IngestionResult::new(records, Vec::new(), Vec::new());

        let view = process_text(&result, "cm:7").unwrap();
        assert_eq!(view.total_logs, 2);
        assert_eq!(view.process_name, "cm");
        assert!(view.raw_text.ends_with('\n'));
    }

    #[test]
    fn test_unknown_process_is_not_found() {
        let result = IngestionResult::new(Vec::new(), Vec::new(), Vec::new());
        assert!(matches!(
            process_text(&result, "ghost:1"),
            Err(IndexError::ProcessNotFound(_))
        ));
    }
}
