pub mod export;
pub mod health;
pub mod process;
pub mod raw;
pub mod upload;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Headroom over the archive size limit for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Successful JSON body: `{"success": true, ...fields}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Success<T> {
    pub fn json(body: T) -> Json<Self> {
        Json(Self {
            success: true,
            body,
        })
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;

    let cors = if server.enable_cors {
        let origins = server
            .cors_origins
            .iter()
            .filter_map(|s| s.parse::<axum::http::HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
    };

    let request_timeout = Duration::from_secs(server.request_timeout_secs);
    let body_limit = state
        .config
        .ingest
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .route("/api/parse-brm-logs", post(upload::parse_logs))
        .route(
            "/api/get-process-logs/{key}/{process}",
            get(process::get_process_logs),
        )
        .route(
            "/api/get-unique-errors/{key}/{process}",
            get(process::get_unique_errors),
        )
        .route(
            "/api/get-full-cm-logs/{key}/{process}",
            get(process::get_full_process_logs),
        )
        .route("/api/get-complete-logs/{key}", get(raw::get_complete_logs))
        .route("/api/get-file-list/{key}", get(raw::get_file_list))
        .route("/api/get-unparsed-lines/{key}", get(raw::get_unparsed_lines))
        .route("/api/download-all-cm-logs/{key}", get(export::download_all))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::io::{Cursor, Read, Write};
    use tower::ServiceExt;
    use zip::write::SimpleFileOptions;
    use zip::{ZipArchive, ZipWriter};

    const BOUNDARY: &str = "cmlogboundary";

    const CM_LOG: &str = "\
CM starting
E Mon Jan 1 00:00:00 2024 host1 cm:4242 fm_utils.c:10 thread-1
disk full
  0 PIN_FLD_POID  POID [0] 0.0.0.1 /account 1
E Mon Jan 1 00:00:01 2024 host1 cm:4242 fm_utils.c:10 thread-1
disk full
W Mon Jan 1 00:00:02 2024 host1 cm:4242 fm_bill.c:77 thread-1
slow query
D Mon Jan 1 00:00:03 2024 host1 dm_oracle:99 dm.c:5 thread-9
connected";

    fn archive() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("cm.pinlog", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(CM_LOG.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn app() -> Router {
        build_router(AppState::new(ViewerConfig::default()))
    }

    fn upload_request(file_name: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/zip\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/parse-brm-logs")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Upload the sample archive and return its cache key.
    async fn upload(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(upload_request("logs.zip", &archive()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        body["cacheKey"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_upload_returns_summary() {
        let app = app();
        let response = app
            .oneshot(upload_request("logs.zip", &archive()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["summary"]["totalLogs"], 4);
        assert_eq!(body["summary"]["totalErrors"], 2);
        assert_eq!(body["summary"]["totalProcesses"], 2);
        assert_eq!(body["summary"]["unparsedLines"], 1);
        assert_eq!(body["summary"]["processes"][0]["process"], "cm:4242");
    }

    #[tokio::test]
    async fn test_reupload_hits_cache() {
        let app = app();
        let first = upload(&app).await;
        let response = app
            .clone()
            .oneshot(upload_request("other-name.zip", &archive()))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["cacheKey"], first.as_str());
        assert_eq!(body["cached"], true);
    }

    #[tokio::test]
    async fn test_upload_rejects_wrong_extension() {
        let response = app()
            .oneshot(upload_request("logs.tar.gz", &archive()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Only ZIP files are supported");
    }

    #[tokio::test]
    async fn test_upload_rejects_corrupt_archive() {
        let response = app()
            .oneshot(upload_request("logs.zip", b"not a zip at all"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "INVALID_ARCHIVE");
    }

    #[tokio::test]
    async fn test_process_logs_filter_and_paginate() {
        let app = app();
        let key = upload(&app).await;

        let response = app
            .clone()
            .oneshot(get(&format!(
                "/api/get-process-logs/{key}/cm:4242?level=E&per_page=1&page=2"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["total_pages"], 2);
        assert_eq!(body["logs"][0]["lineNumber"], 2);
        assert_eq!(body["logs"][0]["sourceFile"], "fm_utils.c:10");

        let response = app
            .oneshot(get(&format!(
                "/api/get-process-logs/{key}/cm:4242?search=PIN_FLD_POID"
            )))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["logs"][0]["lineNumber"], 1);
    }

    #[tokio::test]
    async fn test_bad_page_size_is_rejected() {
        let app = app();
        let key = upload(&app).await;
        let response = app
            .oneshot(get(&format!(
                "/api/get-process-logs/{key}/cm:4242?per_page=0"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unique_errors() {
        let app = app();
        let key = upload(&app).await;
        let response = app
            .oneshot(get(&format!("/api/get-unique-errors/{key}/cm:4242")))
            .await
            .unwrap();
        let body = json_body(response).await;
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["count"], 2);
        assert_eq!(errors[0]["firstLine"], 1);
        assert_eq!(errors[0]["message"], "disk full");
    }

    #[tokio::test]
    async fn test_unknown_key_reports_cache_expired() {
        let response = app()
            .oneshot(get("/api/get-file-list/0123abcd"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Cache expired. Please re-upload file.");
    }

    #[tokio::test]
    async fn test_raw_window_and_guard() {
        let app = app();
        let key = upload(&app).await;

        let response = app
            .clone()
            .oneshot(get(&format!(
                "/api/get-complete-logs/{key}?file_name=cm.pinlog&from_line=2&to_line=3"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["displayedLines"], 2);
        assert_eq!(body["totalLines"], 10);
        assert!(body["rawText"]
            .as_str()
            .unwrap()
            .starts_with("     2 | E Mon Jan 1"));

        let response = app
            .oneshot(get(&format!(
                "/api/get-complete-logs/{key}?from_line=1&to_line=9000"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "WINDOW_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_file_list_and_unparsed_lines() {
        let app = app();
        let key = upload(&app).await;

        let body = json_body(
            app.clone()
                .oneshot(get(&format!("/api/get-file-list/{key}")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["files"][0]["name"], "cm.pinlog");
        assert_eq!(body["files"][0]["lines"], 10);

        let body = json_body(
            app.oneshot(get(&format!("/api/get-unparsed-lines/{key}")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["unparsed"][0]["file"], "cm.pinlog");
        assert_eq!(body["unparsed"][0]["lines"][0]["text"], "CM starting");
    }

    #[tokio::test]
    async fn test_full_process_logs() {
        let app = app();
        let key = upload(&app).await;

        let response = app
            .clone()
            .oneshot(get(&format!("/api/get-full-cm-logs/{key}/dm_oracle:99")))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["totalLogs"], 1);
        assert_eq!(body["processName"], "dm_oracle");
        assert_eq!(
            body["rawText"],
            "D Mon Jan 1 00:00:03 2024 host1 dm_oracle:99 dm.c:5 thread-9\n    connected\n"
        );

        let response = app
            .oneshot(get(&format!("/api/get-full-cm-logs/{key}/ghost:1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No logs found for this CM process");
    }

    #[tokio::test]
    async fn test_download_all_is_zip_per_process() {
        let app = app();
        let key = upload(&app).await;

        let response = app
            .oneshot(get(&format!("/api/download-all-cm-logs/{key}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/zip"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"brm_cm_logs_"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let mut zip = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        assert_eq!(zip.len(), 2);
        let mut first = String::new();
        {
            let mut entry = zip.by_index(0).unwrap();
            assert_eq!(entry.name(), "cm_4242.log");
            entry.read_to_string(&mut first).unwrap();
        }
        assert!(first.contains("    slow query"));
        assert_eq!(zip.by_index(1).unwrap().name(), "dm_oracle_99.log");
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let app = app();
        let _ = upload(&app).await;

        let body = json_body(app.clone().oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["cache"]["entries"], 1);

        let body = json_body(app.oneshot(get("/metrics")).await.unwrap()).await;
        assert_eq!(body["archives"]["ingested"], 1);
        assert_eq!(body["records"]["extracted"], 4);
        assert_eq!(body["cache"]["misses"], 1);
    }
}
