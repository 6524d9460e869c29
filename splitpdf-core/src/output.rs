//! Filesystem output
//!
//! The local variant of the pipeline: instead of an archive, output units are
//! written straight to disk.

use crate::document::SourceDocument;
use crate::error::{Result, SplitError};
use crate::naming::OutputNaming;
use crate::selection::SplitMode;
use crate::selector::{select, OutputUnit};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Create `dir` if needed. An existing directory is fine: concurrent runs on
/// the same day share it.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| SplitError::filesystem(dir, err))
}

/// Serialize every unit into `dir`, returning the written paths in unit order.
pub fn write_units(
    document: &SourceDocument,
    units: &[OutputUnit],
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(units.len());

    for unit in units {
        let bytes = document.extract(unit.pages())?;
        let path = dir.join(unit.filename());
        fs::write(&path, &bytes).map_err(|err| SplitError::filesystem(&path, err))?;
        written.push(path);
    }

    Ok(written)
}

/// Split every page of `document` into `base_dir/Payslips {DD-MM-YYYY}/`,
/// named `{index}-{suffix}.pdf`.
#[instrument(skip(document, naming), fields(base_dir = %base_dir.display()))]
pub fn write_split_to_dir(
    document: &SourceDocument,
    base_dir: &Path,
    naming: &OutputNaming,
) -> Result<Vec<PathBuf>> {
    let dir = base_dir.join(naming.output_dir_name());
    ensure_dir(&dir)?;

    let units = select(document, SplitMode::Split, &[], naming)?;
    let written = write_units(document, &units, &dir)?;

    info!(files = written.len(), dir = %dir.display(), "Pages written");
    Ok(written)
}

/// Write the single output of [`SplitMode::Select`] or [`SplitMode::Delete`]
/// into `dir` and return its path.
#[instrument(skip(document, page_numbers, naming), fields(dir = %dir.display()))]
pub fn write_selection_to_dir(
    document: &SourceDocument,
    mode: SplitMode,
    page_numbers: &[i64],
    dir: &Path,
    naming: &OutputNaming,
) -> Result<PathBuf> {
    ensure_dir(dir)?;

    let units = select(document, mode, page_numbers, naming)?;
    let mut written = write_units(document, &units, dir)?;

    // Single-file modes always yield exactly one unit
    let path = written.pop().ok_or_else(|| {
        SplitError::Codec("selection produced no output document".to_string())
    })?;

    info!(path = %path.display(), "Document written");
    Ok(path)
}
