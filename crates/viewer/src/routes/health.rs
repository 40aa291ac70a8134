use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Root handler - shows API info
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": "CM Log Viewer API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "/api/parse-brm-logs",
            "health": "/health",
            "metrics": "/metrics"
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.indexer.cache_stats();
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "cache": {
            "entries": cache.entries,
            "in_flight": cache.in_flight
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snap = state.indexer.metrics_snapshot();
    let cache = state.indexer.cache_stats();
    Json(json!({
        "archives": {
            "ingested": snap.archives_ingested,
            "rejected": snap.archives_rejected
        },
        "members": {
            "parsed": snap.members_parsed,
            "failed": snap.member_failures
        },
        "records": {
            "extracted": snap.records_extracted,
            "unparsed_lines": snap.unparsed_lines
        },
        "cache": {
            "entries": cache.entries,
            "in_flight": cache.in_flight,
            "hits": snap.cache_hits,
            "misses": snap.cache_misses,
            "evictions": snap.cache_evictions
        }
    }))
}
