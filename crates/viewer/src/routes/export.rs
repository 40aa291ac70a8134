use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use indexer::rebuild::{export_archive, export_file_name};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/download-all-cm-logs/{key}
pub async fn download_all(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let result = state.indexer.lookup(&key)?;

    let bytes = tokio::task::spawn_blocking(move || export_archive(&result))
        .await
        .map_err(|e| ApiError::Internal(format!("export task failed: {e}")))??;

    let file_name = export_file_name(chrono::Utc::now());
    info!(digest = %key, bytes = bytes.len(), file = %file_name, "Exporting per-process logs");

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}
