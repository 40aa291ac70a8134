use axum::extract::{Multipart, State};
use axum::Json;
use indexer::{IndexError, Summary};
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

/// Multipart field carrying the archive.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub cache_key: String,
    pub summary: Summary,
    /// True when identical content was already ingested.
    pub cached: bool,
}

/// POST /api/parse-brm-logs
pub async fn parse_logs(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        info!(file = %file_name, size = bytes.len(), "Received archive upload");

        let cached = state.indexer.ingest_upload(&file_name, bytes).await?;
        if cached.from_cache {
            info!(file = %file_name, digest = %cached.key, "Using cached ingestion");
        }

        return Ok(Json(UploadResponse {
            success: true,
            cache_key: cached.key,
            summary: cached.result.summary.clone(),
            cached: cached.from_cache,
        }));
    }

    Err(IndexError::MissingUpload.into())
}
