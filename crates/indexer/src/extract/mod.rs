//! Record extractor: turns the decoded text of one archive member into
//! an ordered list of [`LogRecord`]s.
//!
//! A single forward scan over `\n`-split lines:
//!
//! 1. Seek a header. Lines before the first header belong to no record and
//!    are reported in [`Extraction::preamble`].
//! 2. The next line, if it is non-blank and not itself a header, is the
//!    record's message (trimmed).
//! 3. Every following line up to the next header (or end of input) is kept
//!    verbatim as the record's flist content.
//!
//! Header detection always wins: a header-shaped line starts a new record
//! wherever it appears. Extraction never fails.

pub mod grammar;

use crate::record::{split_process_key, LogRecord, UnparsedLine};

pub use grammar::{is_header, parse_header, Header};

/// Output of scanning one member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Records in file order, `sequence_number` still zero.
    pub records: Vec<LogRecord>,
    /// Lines dropped while seeking the first header.
    pub preamble: Vec<UnparsedLine>,
}

/// Scan `content` read from archive member `origin_file`.
pub fn extract(content: &str, origin_file: &str) -> Extraction {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut out = Extraction::default();
    let mut i = 0;

    while i < lines.len() {
        let raw_header = lines[i];
        let Some(header) = parse_header(raw_header) else {
            // The empty segment after a final newline is not a line.
            let trailing = i + 1 == lines.len() && raw_header.is_empty();
            if !trailing {
                out.preamble.push(UnparsedLine {
                    line: i + 1,
                    text: raw_header.to_string(),
                });
            }
            i += 1;
            continue;
        };
        i += 1;

        let mut message = "";
        if let Some(next) = lines.get(i) {
            if !next.trim().is_empty() && !is_header(next) {
                message = next.trim();
                i += 1;
            }
        }

        let flist_start = i;
        while i < lines.len() && !is_header(lines[i]) {
            i += 1;
        }

        out.records.push(build_record(
            &header,
            raw_header,
            message,
            lines[flist_start..i].join("\n"),
            origin_file,
        ));
    }

    out
}

fn build_record(
    header: &Header<'_>,
    raw_header: &str,
    message: &str,
    flist_content: String,
    origin_file: &str,
) -> LogRecord {
    let (process_name, process_pid) = split_process_key(header.process);
    LogRecord {
        level: header.level,
        timestamp: header.timestamp.to_string(),
        hostname: header.hostname.to_string(),
        process_key: header.process.to_string(),
        process_name,
        process_pid,
        source_location: header.source.to_string(),
        thread_info: header.thread_info.to_string(),
        message: message.to_string(),
        flist_content,
        origin_file: origin_file.to_string(),
        raw_header: raw_header.to_string(),
        sequence_number: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Level;

    const H1: &str = "E Mon Jan 1 00:00:00 2024 host1 proc_a:100 file.c:10 thread-1";
    const H2: &str = "W Mon Jan 1 00:00:01 2024 host1 proc_a:100 file.c:20 thread-1";
    const H3: &str = "D Mon Jan 1 00:00:02 2024 host1 proc_b:200 other.c:5 thread-2";

    #[test]
    fn test_empty_input() {
        let out = extract("", "a.log");
        assert!(out.records.is_empty());
        assert!(out.preamble.is_empty());
    }

    #[test]
    fn test_trailing_newline_is_not_an_unparsed_line() {
        let out = extract("banner\n", "a.log");
        assert_eq!(
            out.preamble,
            vec![UnparsedLine { line: 1, text: "banner".into() }]
        );

        // Blank lines inside the preamble still count.
        let out = extract("banner\n\n", "a.log");
        assert_eq!(out.preamble.len(), 2);
        assert_eq!(out.preamble[1], UnparsedLine { line: 2, text: String::new() });
    }

    #[test]
    fn test_no_headers_yields_no_records() {
        let out = extract("just\nsome\ntext", "a.log");
        assert!(out.records.is_empty());
        assert_eq!(out.preamble.len(), 3);
        assert_eq!(out.preamble[1], UnparsedLine { line: 2, text: "some".into() });
    }

    #[test]
    fn test_two_headers_with_message_and_no_flist() {
        let content = format!("{H1}\n    first message\n{H2}\n    second message");
        let out = extract(&content, "cm.log");

        assert_eq!(out.records.len(), 2);
        let first = &out.records[0];
        assert_eq!(first.level, Level::Error);
        assert_eq!(first.message, "first message");
        assert_eq!(first.flist_content, "");
        assert_eq!(first.process_key, "proc_a:100");
        assert_eq!(first.process_name, "proc_a");
        assert_eq!(first.process_pid, "100");
        assert_eq!(first.source_location, "file.c:10");
        assert_eq!(first.origin_file, "cm.log");
        assert_eq!(first.raw_header, H1);

        assert_eq!(out.records[1].level, Level::Warning);
        assert_eq!(out.records[1].message, "second message");
        assert!(out.preamble.is_empty());
    }

    #[test]
    fn test_flist_is_kept_verbatim() {
        let content = format!(
            "{H1}\n    op failed\n0 PIN_FLD_POID   POID [0] 0.0.0.1 /account 1\n  1 PIN_FLD_NAME STR [0] \"x\"\n\n{H3}\n"
        );
        let out = extract(&content, "cm.log");

        assert_eq!(out.records.len(), 2);
        assert_eq!(
            out.records[0].flist_content,
            "0 PIN_FLD_POID   POID [0] 0.0.0.1 /account 1\n  1 PIN_FLD_NAME STR [0] \"x\"\n"
        );
        // Last header: message is the empty trailing line, so absent.
        assert_eq!(out.records[1].message, "");
        assert_eq!(out.records[1].flist_content, "");
    }

    #[test]
    fn test_blank_line_after_header_leaves_message_empty() {
        let content = format!("{H1}\n\n  detail\n{H2}");
        let out = extract(&content, "cm.log");

        assert_eq!(out.records[0].message, "");
        // The blank line is not consumed by the message and opens the flist.
        assert_eq!(out.records[0].flist_content, "\n  detail");
    }

    #[test]
    fn test_header_never_becomes_message() {
        let content = format!("{H1}\n{H2}\n    msg");
        let out = extract(&content, "cm.log");

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].message, "");
        assert_eq!(out.records[1].message, "msg");
    }

    #[test]
    fn test_header_inside_continuation_block_splits_record() {
        let content = format!("{H1}\n    msg\nblock line 1\n{H3}\nblock line 2");
        let out = extract(&content, "cm.log");

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].flist_content, "block line 1");
        // Non-header line right after a header is the message, not flist.
        assert_eq!(out.records[1].message, "block line 2");
    }

    #[test]
    fn test_preamble_is_reported_with_line_numbers() {
        let content = format!("garbage 1\ngarbage 2\n{H1}\n    msg");
        let out = extract(&content, "cm.log");

        assert_eq!(out.records.len(), 1);
        assert_eq!(
            out.preamble,
            vec![
                UnparsedLine { line: 1, text: "garbage 1".into() },
                UnparsedLine { line: 2, text: "garbage 2".into() },
            ]
        );
    }

    #[test]
    fn test_crlf_lines_still_match() {
        let content = format!("{H1}\r\n    msg\r\n{H2}\r\n");
        let out = extract(&content, "cm.log");

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].message, "msg");
        assert_eq!(out.records[0].thread_info, "thread-1\r");
    }
}
