// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Page selection parsing

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use thiserror::Error;

/// Accepted shape of a page selection: `1`, `1,3`, `5-10`, `1,5-10,15`
pub const PAGE_SELECTION_PATTERN: &str = r"^([0-9]+(-[0-9]+)?)(,[0-9]+(-[0-9]+)?)*$";

/// Same shape, also accepting the empty "all pages" selection
pub const OPTIONAL_PAGE_SELECTION_PATTERN: &str =
    r"^$|^([0-9]+(-[0-9]+)?)(,[0-9]+(-[0-9]+)?)*$";

/// Most pages a single selection may expand to
pub const MAX_SELECTED_PAGES: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRangeError {
    #[error("page selection is empty")]
    Empty,
    #[error("invalid page selection '{0}', use comma-separated pages and ranges such as 1,3,5-10")]
    InvalidFormat(String),
    #[error("page numbers start at 1, got {0}")]
    ZeroPage(String),
    #[error("invalid range {start}-{end}, start is after end")]
    ReversedRange { start: u32, end: u32 },
    #[error("page number out of range: {0}")]
    Overflow(String),
    #[error("page selection covers {count} pages, at most {} can be expanded", MAX_SELECTED_PAGES)]
    TooManyPages { count: u64 },
}

fn page_selection_regex() -> &'static Regex {
    static PAGES_REGEX: OnceLock<Regex> = OnceLock::new();
    PAGES_REGEX.get_or_init(|| Regex::new(PAGE_SELECTION_PATTERN).expect("valid page pattern"))
}

/// Whether `selection` has the shape of a page selection (numbers are not range-checked)
pub fn matches_page_pattern(selection: &str) -> bool {
    page_selection_regex().is_match(selection)
}

/// Inclusive `(start, end)` bounds of each entry, without expanding ranges
fn parse_bounds(selection: &str) -> Result<Vec<(u32, u32)>, PageRangeError> {
    let compact: String = selection.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(PageRangeError::Empty);
    }
    if !matches_page_pattern(&compact) {
        return Err(PageRangeError::InvalidFormat(selection.to_string()));
    }

    compact
        .split(',')
        .map(|part| match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_page(start)?;
                let end = parse_page(end)?;
                if start > end {
                    return Err(PageRangeError::ReversedRange { start, end });
                }
                Ok((start, end))
            }
            None => parse_page(part).map(|page| (page, page)),
        })
        .collect()
}

/// Check page numbers and range order; cost is linear in the text, not the page count
pub fn check_page_selection(selection: &str) -> Result<(), PageRangeError> {
    parse_bounds(selection).map(|_| ())
}

/// Expand a page selection into sorted, de-duplicated 1-based page numbers.
///
/// Whitespace around entries is tolerated (`1, 3`), the result of `5-7` is
/// `[5, 6, 7]`. Selections spanning more than [`MAX_SELECTED_PAGES`] pages
/// are rejected before anything is expanded.
pub fn parse_page_range(selection: &str) -> Result<Vec<u32>, PageRangeError> {
    let bounds = parse_bounds(selection)?;

    let count: u64 = bounds
        .iter()
        .map(|&(start, end)| u64::from(end - start) + 1)
        .sum();
    if count > MAX_SELECTED_PAGES {
        return Err(PageRangeError::TooManyPages { count });
    }

    let mut pages = BTreeSet::new();
    for (start, end) in bounds {
        pages.extend(start..=end);
    }
    Ok(pages.into_iter().collect())
}

fn parse_page(text: &str) -> Result<u32, PageRangeError> {
    let page: u32 = text.parse().map_err(|_| PageRangeError::Overflow(text.to_string()))?;
    if page == 0 {
        return Err(PageRangeError::ZeroPage(text.to_string()));
    }
    Ok(page)
}
