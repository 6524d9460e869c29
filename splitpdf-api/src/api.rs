use crate::config::MAX_UPLOAD_BYTES;
use crate::form::SplitForm;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Json, Multipart},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use splitpdf::{build_archive, OutputNaming, SplitError, SplitMode, ARCHIVE_FILENAME};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Application-specific error types for the API
#[derive(Debug)]
pub enum AppError {
    /// Errors from the split pipeline (selection, codec, archive)
    Split(SplitError),
    /// The multipart body could not be read
    Multipart(String),
    /// The body went over the upload limit
    PayloadTooLarge(String),
    /// The blocking worker panicked or was cancelled
    Task(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Clients expect a 200 with an error body when nothing was uploaded
            AppError::Split(SplitError::MissingFile) => StatusCode::OK,
            AppError::Split(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Split(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_msg = match self {
            AppError::Split(e) => e.to_string(),
            AppError::Multipart(e) | AppError::PayloadTooLarge(e) | AppError::Task(e) => e,
        };

        if status.is_server_error() {
            error!(%status, "{error_msg}");
        } else {
            warn!(%status, "{error_msg}");
        }

        let error_response = ErrorResponse { error: error_msg };

        (status, Json(error_response)).into_response()
    }
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        AppError::Split(err)
    }
}

/// Build the application router with all routes configured
pub fn app() -> Router {
    router(MAX_UPLOAD_BYTES)
}

/// Same routes as [`app`], with request bodies capped at `max_upload_bytes`
pub fn router(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/split", post(split_pdf))
        .route("/download", post(download_selected))
        .route("/delete", post(delete_pages))
        .route("/api/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Split every page of the upload into its own PDF
pub async fn split_pdf(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    process(SplitMode::Split, multipart).await
}

/// Keep only the pages listed in `selectedPages`, in the order given
pub async fn download_selected(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    process(SplitMode::Select, multipart).await
}

/// Drop the pages listed in `selectedPages`
pub async fn delete_pages(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    process(SplitMode::Delete, multipart).await
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "splitpdf API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn process(
    mode: SplitMode,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    // A body that is not multipart at all carries no file either
    let multipart = multipart.map_err(|rejection| {
        warn!(%rejection, "Request body is not multipart");
        AppError::Split(SplitError::MissingFile)
    })?;

    let form = SplitForm::from_multipart(multipart).await?;
    let upload = form.require_upload()?;

    let page_numbers = match mode {
        SplitMode::Split => Vec::new(),
        SplitMode::Select | SplitMode::Delete => form.require_pages()?,
    };

    let naming = OutputNaming::today()
        .with_custom_name(form.file_name.as_deref())
        .with_original_filename(Some(&upload.filename));

    info!(
        ?mode,
        filename = %upload.filename,
        upload_bytes = upload.data.len(),
        pages = page_numbers.len(),
        "Processing upload"
    );

    // Parsing and re-encoding are CPU-bound
    let data = upload.data.clone();
    let archive = tokio::task::spawn_blocking(move || {
        build_archive(&data, mode, &page_numbers, &naming)
    })
    .await
    .map_err(|e| AppError::Task(format!("Task join error: {e}")))??;

    Ok(zip_response(archive))
}

fn zip_response(archive: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ARCHIVE_FILENAME}\""),
            ),
        ],
        archive,
    )
        .into_response()
}
