//! Multipart form decoding for the split endpoints

use crate::api::AppError;
use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use serde::Deserialize;
use splitpdf::SplitError;
use tracing::debug;

/// Multipart field carrying the uploaded PDF.
pub const FILE_FIELD: &str = "pdfFile";

/// Multipart field carrying the JSON array of 1-based page numbers.
pub const PAGES_FIELD: &str = "selectedPages";

/// Multipart field carrying an optional output name.
pub const NAME_FIELD: &str = "fileName";

/// The uploaded file together with the filename the client sent.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Bytes,
}

/// Decoded form of a `/split`, `/download` or `/delete` request
#[derive(Debug, Default)]
pub struct SplitForm {
    pub upload: Option<Upload>,
    pub selected_pages: Option<String>,
    pub file_name: Option<String>,
}

impl SplitForm {
    /// Read every field of the form. Unknown fields are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = SplitForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Failed to read multipart field", e))?
        {
            let name = field.name().unwrap_or("").to_string();
            debug!(field = %name, filename = ?field.file_name(), "Received form field");

            match name.as_str() {
                FILE_FIELD => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Failed to read file data", e))?;
                    form.upload = Some(Upload { filename, data });
                }
                PAGES_FIELD => {
                    form.selected_pages = Some(read_text(field).await?);
                }
                NAME_FIELD => {
                    form.file_name = parse_file_name(&read_text(field).await?);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The upload, or `MissingFile` when no file was sent or its filename is
    /// empty.
    pub fn require_upload(&self) -> Result<&Upload, SplitError> {
        self.upload
            .as_ref()
            .filter(|upload| !upload.filename.is_empty())
            .ok_or(SplitError::MissingFile)
    }

    /// The decoded `selectedPages` list; the field is mandatory.
    pub fn require_pages(&self) -> Result<Vec<i64>, SplitError> {
        let raw = self.selected_pages.as_deref().ok_or_else(|| {
            SplitError::MalformedPageList(format!("missing `{PAGES_FIELD}` field"))
        })?;
        parse_selected_pages(raw)
    }
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| multipart_error("Failed to read form field", e))
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    let message = format!("{context}: {}", err.body_text());
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::Multipart(message)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageNumber {
    Number(i64),
    Text(String),
}

/// Decode a JSON array of page numbers. Elements may be integers or strings
/// holding an integer, e.g. `["2", "4"]` or `[2, 4]`.
pub fn parse_selected_pages(raw: &str) -> Result<Vec<i64>, SplitError> {
    let items: Vec<PageNumber> = serde_json::from_str(raw).map_err(|e| {
        SplitError::MalformedPageList(format!("expected a JSON array of page numbers: {e}"))
    })?;

    items
        .into_iter()
        .map(|item| match item {
            PageNumber::Number(n) => Ok(n),
            PageNumber::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                SplitError::MalformedPageList(format!("'{s}' is not a page number"))
            }),
        })
        .collect()
}

/// `fileName` arrives either as plain text or JSON-encoded (`"\"march\""`).
/// Blank values count as absent.
pub fn parse_file_name(raw: &str) -> Option<String> {
    let name = serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string());
    let name = name.trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
