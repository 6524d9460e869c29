//! Page selection policies
//!
//! Clients address pages with 1-based page numbers. Everything past
//! [`Selection::resolve`] works with 0-based [`PageIndex`] values, so the
//! conversion happens exactly once, right after validation.

use crate::error::{Result, SplitError};
use std::collections::HashSet;
use std::fmt;

/// Longest range accepted by [`parse_page_list`].
pub const MAX_RANGE_LEN: i64 = 65_536;

/// 0-based position of a page inside a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageIndex(usize);

impl PageIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// The 1-based page number a client would use for this page.
    pub fn page_number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the caller asked to do with the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// One output file per page
    Split,
    /// One output file with only the listed pages, in list order
    Select,
    /// One output file with every page except the listed ones
    Delete,
}

impl SplitMode {
    /// Prefix of the default output filename. Only the single-file modes
    /// have one; split outputs are named per page.
    pub fn default_prefix(self) -> Option<&'static str> {
        match self {
            SplitMode::Split => None,
            SplitMode::Select => Some("selected"),
            SplitMode::Delete => Some("deleted"),
        }
    }
}

/// Client page policy, still expressed in 1-based page numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every page
    All,
    /// Listed pages in the order given; repeats are kept
    Include(Vec<i64>),
    /// Every page whose number is not listed
    Exclude(Vec<i64>),
}

impl Selection {
    /// Build the selection matching a mode. Split ignores the page list.
    pub fn for_mode(mode: SplitMode, page_numbers: Vec<i64>) -> Self {
        match mode {
            SplitMode::Split => Selection::All,
            SplitMode::Select => Selection::Include(page_numbers),
            SplitMode::Delete => Selection::Exclude(page_numbers),
        }
    }

    /// Validate every page number against `1..=total_pages` and convert the
    /// selection to an ordered list of 0-based indices.
    pub fn resolve(&self, total_pages: usize) -> Result<Vec<PageIndex>> {
        match self {
            Selection::All => Ok((0..total_pages).map(PageIndex::new).collect()),
            Selection::Include(numbers) => numbers
                .iter()
                .map(|&number| to_index(number, total_pages))
                .collect(),
            Selection::Exclude(numbers) => {
                let excluded = numbers
                    .iter()
                    .map(|&number| to_index(number, total_pages))
                    .collect::<Result<HashSet<_>>>()?;

                Ok((0..total_pages)
                    .map(PageIndex::new)
                    .filter(|index| !excluded.contains(index))
                    .collect())
            }
        }
    }
}

fn to_index(page_number: i64, total_pages: usize) -> Result<PageIndex> {
    if page_number < 1 || page_number as u64 > total_pages as u64 {
        return Err(SplitError::InvalidPageNumber {
            page: page_number,
            total: total_pages,
        });
    }
    Ok(PageIndex::new(page_number as usize - 1))
}

/// Parse a page list such as `"2,4,6-8"` into 1-based page numbers.
///
/// Order and repeats are preserved. Ranges are inclusive and must not run
/// backwards. Empty items (e.g. a trailing comma) are ignored.
pub fn parse_page_list(s: &str) -> Result<Vec<i64>> {
    let mut pages = Vec::new();

    for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        if let Some((start, end)) = part.split_once('-') {
            let start = parse_page_number(start)?;
            let end = parse_page_number(end)?;

            if start > end {
                return Err(SplitError::MalformedPageList(format!(
                    "range {start}-{end} runs backwards"
                )));
            }
            if end - start >= MAX_RANGE_LEN {
                return Err(SplitError::MalformedPageList(format!(
                    "range {start}-{end} is too large"
                )));
            }
            pages.extend(start..=end);
        } else {
            pages.push(parse_page_number(part)?);
        }
    }

    Ok(pages)
}

fn parse_page_number(s: &str) -> Result<i64> {
    let s = s.trim();
    let number = s
        .parse::<i64>()
        .map_err(|_| SplitError::MalformedPageList(format!("'{s}' is not a page number")))?;

    if number < 1 {
        return Err(SplitError::MalformedPageList(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(number)
}
