//! # splitpdf
//!
//! Split a PDF into one file per page, or keep/drop client-selected pages, and
//! pack the results into a ZIP archive.
//!
//! ## Pipeline
//!
//! 1. [`SourceDocument::from_bytes`] parses the upload once.
//! 2. [`select`] validates the client's 1-based page numbers and produces the
//!    ordered [`OutputUnit`]s for a [`SplitMode`].
//! 3. [`assemble`] serializes each unit to a standalone PDF and writes it into
//!    an in-memory ZIP (Deflate, level 9).
//!
//! The filesystem variant ([`output`]) writes units straight to a dated
//! directory instead.
//!
//! ## Example
//!
//! ```rust,no_run
//! use splitpdf::{build_archive, OutputNaming, SplitMode};
//!
//! # fn main() -> splitpdf::Result<()> {
//! let data = std::fs::read("payslips.pdf").unwrap();
//! let naming = OutputNaming::today().with_original_filename(Some("payslips.pdf"));
//!
//! // Pages 2 and 4, in that order
//! let zip = build_archive(&data, SplitMode::Select, &[2, 4], &naming)?;
//! std::fs::write("selected.zip", zip).unwrap();
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod naming;
pub mod output;
pub mod selection;
pub mod selector;

pub use archive::{assemble, build_archive, ARCHIVE_FILENAME};
pub use document::SourceDocument;
pub use error::{Result, SplitError};
pub use naming::OutputNaming;
pub use selection::{parse_page_list, PageIndex, Selection, SplitMode};
pub use selector::{select, OutputUnit};
