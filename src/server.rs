use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Query};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{post, MethodRouter};
use axum::{Json, Router};
use cabinet_lib::{process_file_report, LoadError, ProcessingReport};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::staging::{staging_extension, StagedUpload};

/// Multipart field carrying the workbook
pub const FILE_FIELD: &str = "file";

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://rackcizimweb.web.app";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long, env = "RACK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (falls back to $PORT, then 8080)
    #[arg(long, env = "RACK_PORT")]
    pub port: Option<u16>,

    /// The single origin allowed to call the endpoint from a browser
    #[arg(long, env = "RACK_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    /// Largest accepted request body in bytes
    #[arg(long, env = "RACK_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl ServeArgs {
    pub fn resolved_port(&self) -> u16 {
        self.port
            .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(8080)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub allowed_origin: String,
    pub max_upload_bytes: usize,
}

impl From<&ServeArgs> for ServerConfig {
    fn from(args: &ServeArgs) -> Self {
        ServerConfig {
            allowed_origin: args.allowed_origin.clone(),
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Errors only when nothing was accepted, otherwise only accepted cabinets
    #[default]
    Legacy,
    /// Accepted cabinets and rejected sheets side by side
    Full,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub report: ReportFormat,
}

/// Build the upload endpoint, mounted on `/` and `/upload`
pub fn router(config: &ServerConfig) -> anyhow::Result<Router> {
    let origin = HeaderValue::from_str(&config.allowed_origin).map_err(|e| {
        anyhow::anyhow!("Invalid allowed origin '{}': {}", config.allowed_origin, e)
    })?;

    let cors_headers = [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ),
        (
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static("3600"),
        ),
    ];

    let mut app = Router::new()
        .route("/", upload_route())
        .route("/upload", upload_route())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    // CORS headers go on every response, errors included
    for (name, value) in cors_headers {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

fn upload_route() -> MethodRouter {
    post(upload)
        .options(preflight)
        .fallback(method_not_allowed)
}

/// Bind and run the server until Ctrl+C
pub async fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let app = router(&ServerConfig::from(args))?;
    let addr: SocketAddr = format!("{}:{}", args.host, args.resolved_port())
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {e}"))?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        "Listening on http://{} (allowed origin: {})",
        listener.local_addr()?,
        args.allowed_origin
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
    }
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "Only POST and OPTIONS requests are accepted",
    )
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// A file part pulled out of the multipart body
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

async fn upload(
    Query(params): Query<UploadParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(rejection) => return rejection,
    };

    tracing::info!(
        "Processing upload '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    let extension = staging_extension(&upload.file_name);
    let outcome =
        tokio::task::spawn_blocking(move || process_upload(&upload.bytes, &extension)).await;

    match outcome {
        Ok(Ok(report)) => report_response(report, params.report),
        Ok(Err(e)) => processing_error(&e),
        Err(e) => processing_error(&anyhow::anyhow!("Processing task failed: {e}")),
    }
}

/// Find the `file` part; every way it can be absent maps to a 400
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Upload, Response> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Request is not multipart: {}", e);
        error_response(StatusCode::BAD_REQUEST, "No 'file' part in the request")
    })?;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "No 'file' part in the request",
                ));
            }
            Err(e) => {
                return Err(error_response(
                    e.status(),
                    &format!("Invalid multipart body: {}", e.body_text()),
                ));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // A plain form value named `file` is not a file upload
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        if file_name.is_empty() {
            return Err(error_response(StatusCode::BAD_REQUEST, "No file selected"));
        }

        let bytes = field.bytes().await.map_err(|e| {
            error_response(
                e.status(),
                &format!("Invalid multipart body: {}", e.body_text()),
            )
        })?;

        if bytes.is_empty() {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "Uploaded file is empty",
            ));
        }

        return Ok(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }
}

/// Stage the upload in its own temp file and run the core on it
fn process_upload(bytes: &[u8], extension: &str) -> anyhow::Result<ProcessingReport> {
    process_upload_in(&std::env::temp_dir(), bytes, extension)
}

/// The staged file is removed when this returns, success or not
fn process_upload_in(
    staging_dir: &Path,
    bytes: &[u8],
    extension: &str,
) -> anyhow::Result<ProcessingReport> {
    let staged = StagedUpload::write_in(staging_dir, bytes, extension)?;
    let report = process_file_report(staged.path())?;
    Ok(report)
}

fn report_response(report: ProcessingReport, format: ReportFormat) -> Response {
    tracing::info!(
        "Accepted {} cabinet(s), rejected {} sheet(s)",
        report.cabinets.len(),
        report.errors.len()
    );

    match format {
        ReportFormat::Legacy => {
            let response = report.into_response();
            (status_for(response.is_rejected()), Json(response)).into_response()
        }
        ReportFormat::Full => {
            let response = report.into_full_response();
            (status_for(response.is_rejected()), Json(response)).into_response()
        }
    }
}

fn status_for(rejected: bool) -> StatusCode {
    if rejected {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    }
}

/// 500 with a fixed summary; the full chain only goes to the log
///
/// Error text can name the staging path, so none of it reaches the client.
fn processing_error(error: &anyhow::Error) -> Response {
    tracing::error!("Failed to process upload: {:#}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": format!(
                "Server error while processing the file: {}",
                failure_summary(error)
            ),
            "type": "processing_error",
        })),
    )
        .into_response()
}

fn failure_summary(error: &anyhow::Error) -> &'static str {
    if error.downcast_ref::<LoadError>().is_some() {
        "the file could not be read as a spreadsheet"
    } else {
        "internal error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::STAGING_PREFIX;

    #[test]
    fn test_rejected_maps_to_bad_request() {
        assert_eq!(status_for(true), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(false), StatusCode::OK);
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let config = ServerConfig {
            allowed_origin: "bad\norigin".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        };
        assert!(router(&config).is_err());
    }

    #[test]
    fn test_explicit_port_wins() {
        let args = ServeArgs {
            host: "127.0.0.1".to_string(),
            port: Some(9000),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        };
        assert_eq!(args.resolved_port(), 9000);
    }

    #[test]
    fn test_processing_garbage_is_an_error() {
        let result = process_upload(b"not a workbook", "xlsx");
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_upload_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();

        let result = process_upload_in(dir.path(), b"garbage", "xlsx");
        assert!(result.is_err());

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.to_string_lossy().starts_with(STAGING_PREFIX))
            .collect();
        assert!(leftovers.is_empty(), "Staging files left behind: {leftovers:?}");
    }

    #[test]
    fn test_load_failure_summary_hides_staging_path() {
        let dir = tempfile::tempdir().unwrap();
        let error = process_upload_in(dir.path(), b"garbage", "xlsx").unwrap_err();

        // The error itself names the staged file
        assert!(format!("{error:#}").contains(STAGING_PREFIX));

        let summary = failure_summary(&error);
        assert_eq!(summary, "the file could not be read as a spreadsheet");
        assert!(!summary.contains(STAGING_PREFIX));
    }

    #[test]
    fn test_other_failures_get_generic_summary() {
        let error = anyhow::anyhow!("Processing task failed: /tmp/rack-upload-x.xlsx");
        assert_eq!(failure_summary(&error), "internal error");
    }
}
