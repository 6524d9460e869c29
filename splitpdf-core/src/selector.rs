//! Page Selector
//!
//! Turns a document, a [`SplitMode`] and the client's page numbers into the
//! ordered list of [`OutputUnit`]s to emit.

use crate::document::SourceDocument;
use crate::error::Result;
use crate::naming::OutputNaming;
use crate::selection::{PageIndex, Selection, SplitMode};
use tracing::debug;

/// One output file: its name and the source pages it holds, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    filename: String,
    pages: Vec<PageIndex>,
}

impl OutputUnit {
    pub fn new(filename: impl Into<String>, pages: Vec<PageIndex>) -> Self {
        Self {
            filename: filename.into(),
            pages,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn pages(&self) -> &[PageIndex] {
        &self.pages
    }
}

/// Compute the output units for a request.
///
/// - [`SplitMode::Split`] yields one unit per page in document order, named
///   `{index}-{suffix}.pdf`. `page_numbers` is ignored.
/// - [`SplitMode::Select`] yields one unit with the listed pages in list
///   order.
/// - [`SplitMode::Delete`] yields one unit with every unlisted page in
///   document order.
///
/// Every page number is validated before use; one bad number fails the whole
/// request.
pub fn select(
    document: &SourceDocument,
    mode: SplitMode,
    page_numbers: &[i64],
    naming: &OutputNaming,
) -> Result<Vec<OutputUnit>> {
    let total_pages = document.page_count();
    let pages = Selection::for_mode(mode, page_numbers.to_vec()).resolve(total_pages)?;

    let units = match mode {
        SplitMode::Split => pages
            .into_iter()
            .map(|index| OutputUnit::new(naming.page_filename(index), vec![index]))
            .collect(),
        SplitMode::Select | SplitMode::Delete => {
            vec![OutputUnit::new(naming.document_filename(mode), pages)]
        }
    };

    debug!(?mode, total_pages, units = units.len(), "Pages selected");
    Ok(units)
}
