use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use indexer::query::{unique_errors, Page, ProcessQuery, SequenceRange, UniqueError};
use indexer::rebuild::{process_text, ProcessText};
use indexer::LogRecord;
use serde::{Deserialize, Serialize};

use super::Success;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProcessLogsParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub level: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorRangeParams {
    pub from_line: Option<i64>,
    pub to_line: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UniqueErrors {
    pub errors: Vec<UniqueError>,
}

/// GET /api/get-process-logs/{key}/{process}
pub async fn get_process_logs(
    State(state): State<AppState>,
    Path((key, process)): Path<(String, String)>,
    params: Result<Query<ProcessLogsParams>, QueryRejection>,
) -> ApiResult<Json<Success<Page<LogRecord>>>> {
    let Query(params) = params?;
    let query = ProcessQuery::new(
        process,
        params.level.as_deref(),
        params.search.as_deref(),
        params.page.unwrap_or(1),
        params
            .per_page
            .unwrap_or(state.config.query.default_page_size),
    )?;

    let result = state.indexer.lookup(&key)?;
    Ok(Success::json(query.run(&result)?))
}

/// GET /api/get-unique-errors/{key}/{process}
pub async fn get_unique_errors(
    State(state): State<AppState>,
    Path((key, process)): Path<(String, String)>,
    params: Result<Query<ErrorRangeParams>, QueryRejection>,
) -> ApiResult<Json<Success<UniqueErrors>>> {
    let Query(params) = params?;
    let range = SequenceRange::new(params.from_line, params.to_line);

    let result = state.indexer.lookup(&key)?;
    Ok(Success::json(UniqueErrors {
        errors: unique_errors(&result, &process, range),
    }))
}

/// GET /api/get-full-cm-logs/{key}/{process}
pub async fn get_full_process_logs(
    State(state): State<AppState>,
    Path((key, process)): Path<(String, String)>,
) -> ApiResult<Json<Success<ProcessText>>> {
    let result = state.indexer.lookup(&key)?;
    Ok(Success::json(process_text(&result, &process)?))
}
