//! Archive Assembler
//!
//! Serializes every [`OutputUnit`] to a standalone PDF and packs the results
//! into one in-memory ZIP, in unit order.

use crate::document::SourceDocument;
use crate::error::{Result, SplitError};
use crate::naming::OutputNaming;
use crate::selection::SplitMode;
use crate::selector::{select, OutputUnit};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use tracing::{debug, info, instrument, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Download name of every archive served over HTTP.
pub const ARCHIVE_FILENAME: &str = "payslips.zip";

/// Deflate level used for every entry (maximum).
pub const COMPRESSION_LEVEL: i64 = 9;

/// Serialize `units` and write them into a ZIP archive.
///
/// When two units share a filename the later one's bytes replace the earlier
/// entry, which keeps its original position. Any failure aborts the whole
/// archive.
#[instrument(skip_all, fields(units = units.len()))]
pub fn assemble(document: &SourceDocument, units: &[OutputUnit]) -> Result<Vec<u8>> {
    let mut entries: Vec<(&str, Vec<u8>)> = Vec::with_capacity(units.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for unit in units {
        let bytes = document.extract(unit.pages())?;

        match positions.get(unit.filename()) {
            Some(&position) => {
                warn!(filename = unit.filename(), "Duplicate entry name, overwriting");
                entries[position].1 = bytes;
            }
            None => {
                positions.insert(unit.filename(), entries.len());
                entries.push((unit.filename(), bytes));
            }
        }
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (filename, bytes) in &entries {
        zip.start_file(*filename, options)?;
        zip.write_all(bytes).map_err(|e| {
            SplitError::Archive(format!("Failed to write ZIP entry {filename}: {e}"))
        })?;
        debug!(filename, pdf_bytes = bytes.len(), "Archive entry written");
    }

    let archive = zip.finish()?.into_inner();
    info!(
        entries = entries.len(),
        archive_bytes = archive.len(),
        "Archive assembled"
    );
    Ok(archive)
}

/// Parse `data`, select pages for `mode` and assemble the archive.
///
/// This is the whole request pipeline; transports only decode their input
/// and hand it over.
pub fn build_archive(
    data: &[u8],
    mode: SplitMode,
    page_numbers: &[i64],
    naming: &OutputNaming,
) -> Result<Vec<u8>> {
    let document = SourceDocument::from_bytes(data)?;
    let units = select(&document, mode, page_numbers, naming)?;
    assemble(&document, &units)
}
