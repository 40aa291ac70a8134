use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use indexer::rebuild::{RawWindow, WindowRequest};
use indexer::record::{MemberInfo, UnparsedPreamble};
use serde::{Deserialize, Serialize};

use super::Success;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub from_line: Option<i64>,
    pub to_line: Option<i64>,
    pub file_name: Option<String>,
}

impl WindowParams {
    /// A missing `to_line` yields a window of the configured default size.
    fn into_request(self, default_lines: i64) -> WindowRequest {
        let from_line = self.from_line.unwrap_or(1);
        WindowRequest {
            from_line,
            to_line: self
                .to_line
                .unwrap_or_else(|| from_line.saturating_add(default_lines - 1)),
            file_name: self.file_name.filter(|name| !name.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileList {
    pub files: Vec<MemberInfo>,
}

#[derive(Debug, Serialize)]
pub struct UnparsedLines {
    pub unparsed: Vec<UnparsedPreamble>,
}

/// GET /api/get-complete-logs/{key}
pub async fn get_complete_logs(
    State(state): State<AppState>,
    Path(key): Path<String>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> ApiResult<Json<Success<RawWindow>>> {
    let Query(params) = params?;
    let request = params.into_request(state.config.query.default_window_lines);
    Ok(Success::json(state.indexer.raw_window(&key, &request)?))
}

/// GET /api/get-file-list/{key}
pub async fn get_file_list(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Success<FileList>>> {
    let result = state.indexer.lookup(&key)?;
    Ok(Success::json(FileList {
        files: result.members(),
    }))
}

/// GET /api/get-unparsed-lines/{key}
pub async fn get_unparsed_lines(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Success<UnparsedLines>>> {
    let result = state.indexer.lookup(&key)?;
    Ok(Success::json(UnparsedLines {
        unparsed: result.unparsed.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults() {
        let request = WindowParams::default().into_request(100);
        assert_eq!(request.from_line, 1);
        assert_eq!(request.to_line, 100);
        assert_eq!(request.file_name, None);
    }

    #[test]
    fn test_missing_to_line_follows_from_line() {
        let params = WindowParams {
            from_line: Some(401),
            to_line: None,
            file_name: Some(String::new()),
        };
        let request = params.into_request(100);
        assert_eq!(request.to_line, 500);
        assert_eq!(request.file_name, None);
    }
}
