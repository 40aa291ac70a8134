use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a CM log record, written as a single letter in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "D")]
    Debug,
    #[serde(rename = "W")]
    Warning,
    #[serde(rename = "E")]
    Error,
}

impl Level {
    pub fn as_code(&self) -> &'static str {
        match self {
            Level::Debug => "D",
            Level::Warning => "W",
            Level::Error => "E",
        }
    }

    /// Parse the single-letter source code. Anything else is `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "D" => Some(Level::Debug),
            "W" => Some(Level::Warning),
            "E" => Some(Level::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// One reconstructed log record.
///
/// Records are immutable once the ingestor has assigned `sequence_number`.
/// JSON keys keep the names the viewer front-end already consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub level: Level,
    /// Original textual timestamp, never parsed into a calendar type.
    pub timestamp: String,
    pub hostname: String,
    /// `<name>:<pid>`
    #[serde(rename = "process")]
    pub process_key: String,
    pub process_name: String,
    /// Empty when the key carries no `:` separator.
    pub process_pid: String,
    /// `<file>:<line>` of the emitting statement in the CM source tree.
    #[serde(rename = "sourceFile")]
    pub source_location: String,
    pub thread_info: String,
    /// First non-empty line after the header, trimmed. Empty when absent.
    pub message: String,
    /// Everything between the message and the next header, newlines preserved.
    pub flist_content: String,
    /// Archive member the record was read from.
    #[serde(rename = "fileName")]
    pub origin_file: String,
    /// Unmodified header line.
    #[serde(rename = "rawContent")]
    pub raw_header: String,
    /// 1-based position in the merged sequence of one ingestion.
    /// Zero until the ingestor numbers the merged sequence.
    #[serde(rename = "lineNumber")]
    pub sequence_number: u64,
}

impl LogRecord {
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    pub fn has_message(&self) -> bool {
        !self.message.is_empty()
    }
}

/// Split `<name>:<pid>` into its components.
pub fn split_process_key(key: &str) -> (String, String) {
    let mut parts = key.split(':');
    let name = parts.next().unwrap_or_default().to_string();
    let pid = parts.next().unwrap_or_default().to_string();
    (name, pid)
}

/// A line dropped while scanning for the first header of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnparsedLine {
    /// 1-based line number within the member.
    pub line: usize,
    pub text: String,
}

/// Lines of one member that belong to no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnparsedPreamble {
    pub file: String,
    pub lines: Vec<UnparsedLine>,
}
