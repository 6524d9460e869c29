use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("No file attached")]
    MissingFile,

    #[error("Invalid page number: {page} (document has {total} pages)")]
    InvalidPageNumber { page: i64, total: usize },

    #[error("Malformed page list: {0}")]
    MalformedPageList(String),

    #[error("PDF codec error: {0}")]
    Codec(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    /// True when the error was caused by the request itself rather than by
    /// the server or the codec.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SplitError::MissingFile
                | SplitError::InvalidPageNumber { .. }
                | SplitError::MalformedPageList(_)
        )
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SplitError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

impl From<lopdf::Error> for SplitError {
    fn from(err: lopdf::Error) -> Self {
        SplitError::Codec(err.to_string())
    }
}

impl From<zip::result::ZipError> for SplitError {
    fn from(err: zip::result::ZipError) -> Self {
        SplitError::Archive(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;
