//! Output file naming

use crate::selection::{PageIndex, SplitMode};
use chrono::{Local, NaiveDate};

/// Date format used in split filenames and output directories (`DD-MM-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Name used when the caller gave no original filename.
pub const DEFAULT_FILENAME: &str = "document.pdf";

/// Prefix of the directory the filesystem variant writes into.
pub const OUTPUT_DIR_PREFIX: &str = "Payslips";

/// Everything needed to name the files produced for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    custom_name: Option<String>,
    original_filename: Option<String>,
    date: NaiveDate,
}

impl OutputNaming {
    /// Naming for today's date with no caller-supplied names.
    pub fn today() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            custom_name: None,
            original_filename: None,
            date,
        }
    }

    /// Caller-supplied name. For split mode it replaces the date suffix, for
    /// the single-file modes it is the whole filename.
    pub fn with_custom_name(mut self, name: Option<&str>) -> Self {
        self.custom_name = name.and_then(sanitize_filename);
        self
    }

    /// Filename of the uploaded or opened document.
    pub fn with_original_filename(mut self, name: Option<&str>) -> Self {
        self.original_filename = name.and_then(sanitize_filename);
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn date_suffix(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// `{index}-{suffix}.pdf`, where `index` is 0-based.
    pub fn page_filename(&self, index: PageIndex) -> String {
        let suffix = match &self.custom_name {
            Some(name) => name.strip_suffix(".pdf").unwrap_or(name).to_string(),
            None => self.date_suffix(),
        };
        format!("{index}-{suffix}.pdf")
    }

    /// Filename of the single output of select and delete modes.
    pub fn document_filename(&self, mode: SplitMode) -> String {
        if let Some(name) = &self.custom_name {
            return ensure_pdf_extension(name);
        }

        let original = self
            .original_filename
            .as_deref()
            .unwrap_or(DEFAULT_FILENAME);
        match mode.default_prefix() {
            Some(prefix) => format!("{prefix}-{original}"),
            None => original.to_string(),
        }
    }

    /// `Payslips {DD-MM-YYYY}`
    pub fn output_dir_name(&self) -> String {
        format!("{OUTPUT_DIR_PREFIX} {}", self.date_suffix())
    }
}

/// Reduce a client-provided name to a bare filename.
///
/// Only the last path component survives, so names can neither escape the
/// output directory nor create nested archive entries. Returns `None` when
/// nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match last {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

fn ensure_pdf_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}
