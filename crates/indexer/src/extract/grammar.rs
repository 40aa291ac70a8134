//! Header grammar.
//!
//! `<Level> <Timestamp> <Hostname> <Process:Pid> <File:Line> <Rest>`
//!
//! ```text
//! E Mon Jan  1 00:00:00 2024 host1 proc_a:100 file.c:10 thread-1
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::record::Level;

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([DEW])\s+",
        r"(\w{3}\s+\w{3}\s+\d+\s+\d{2}:\d{2}:\d{2}\s+\d{4})\s+",
        r"(\S+)\s+",
        r"(\w+:\d+)\s+",
        r"([\w.]+:\d+)\s+",
        r"(.+)$",
    ))
    .expect("header grammar must be a valid regex")
});

/// Fields captured from one header line, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub level: Level,
    pub timestamp: &'a str,
    pub hostname: &'a str,
    pub process: &'a str,
    pub source: &'a str,
    pub thread_info: &'a str,
}

/// Match `line` against the header grammar.
pub fn parse_header(line: &str) -> Option<Header<'_>> {
    let caps = HEADER_REGEX.captures(line)?;
    let level = Level::from_code(caps.get(1)?.as_str())?;
    Some(Header {
        level,
        timestamp: caps.get(2)?.as_str(),
        hostname: caps.get(3)?.as_str(),
        process: caps.get(4)?.as_str(),
        source: caps.get(5)?.as_str(),
        thread_info: caps.get(6)?.as_str(),
    })
}

#[inline]
pub fn is_header(line: &str) -> bool {
    HEADER_REGEX.is_match(line)
}
