use serde::Serialize;

use crate::error::{IndexError, IndexResult};
use crate::record::IngestionResult;

/// A 1-based, inclusive line range of raw member text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    pub from_line: i64,
    pub to_line: i64,
    /// One member, or `None` for the combined view of all members.
    pub file_name: Option<String>,
}

impl Default for WindowRequest {
    fn default() -> Self {
        Self {
            from_line: 1,
            to_line: 100,
            file_name: None,
        }
    }
}

impl WindowRequest {
    /// Must pass before any cached text is touched.
    pub fn validate(&self, max_lines: i64) -> IndexResult<()> {
        let requested = self.to_line.saturating_sub(self.from_line);
        if requested > max_lines {
            return Err(IndexError::WindowTooLarge {
                requested,
                max: max_lines,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawWindow {
    #[serde(rename = "rawText")]
    pub raw_text: String,
    #[serde(rename = "totalLines")]
    pub total_lines: usize,
    #[serde(rename = "displayedLines")]
    pub displayed_lines: usize,
    pub from_line: i64,
    pub to_line: i64,
}

/// Render the requested window with right-aligned line numbers.
///
/// Callers are expected to have run [`WindowRequest::validate`] first.
pub fn raw_window(result: &IngestionResult, request: &WindowRequest) -> IndexResult<RawWindow> {
    let text = match &request.file_name {
        Some(name) => result
            .raw_file(name)
            .ok_or_else(|| IndexError::MemberNotFound(name.clone()))?
            .content
            .clone(),
        None => {
            if result.raw_files.is_empty() {
                return Err(IndexError::NoRawContent);
            }
            result
                .raw_files
                .iter()
                .map(|m| format!("=== File: {} ===\n{}", m.name, m.content))
                .collect::<Vec<_>>()
                .join("\n")
        }
    };

    let lines: Vec<&str> = text.split('\n').collect();
    let total = lines.len();
    let from_idx = request.from_line.saturating_sub(1).max(0) as usize;
    let to_idx = request.to_line.max(0).min(total as i64) as usize;
    let shown = if from_idx < to_idx {
        &lines[from_idx..to_idx]
    } else {
        &lines[..0]
    };

    let raw_text = shown
        .iter()
        .enumerate()
        .map(|(offset, line)| format!("{:>6} | {}", from_idx + offset + 1, line))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(RawWindow {
        raw_text,
        total_lines: total,
        displayed_lines: shown.len(),
        from_line: request.from_line,
        to_line: request.to_line.min(total as i64),
    })
}
