//! Pagination types
//!
//! Stop conditions, walk state and the decoded page shape shared by the
//! harvester and the decoder.

use crate::error::{Error, Result};
use crate::types::Record;
use serde::{Deserialize, Serialize};

/// When a page walk ends
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopCondition {
    /// Stop when a page comes back with no records
    #[default]
    EmptyPage,

    /// Stop once the page index reaches the total page count the response
    /// declares at `path`
    TotalPagesField {
        /// Dot path to the total page count (e.g. `totalPages`)
        path: String,
    },

    /// Fetch exactly this many pages (fewer if one comes back empty)
    FixedPageCount {
        /// Number of pages; 0 behaves as 1
        pages: u32,
    },
}

impl StopCondition {
    /// Create a total pages stop condition
    pub fn total_pages(path: impl Into<String>) -> Self {
        Self::TotalPagesField { path: path.into() }
    }

    /// Create a fixed page count stop condition
    pub fn fixed(pages: u32) -> Self {
        Self::FixedPageCount { pages }
    }

    /// Single request, no pagination
    pub fn single() -> Self {
        Self::FixedPageCount { pages: 1 }
    }

    /// Path of the total pages field, if this condition reads one
    pub fn total_pages_path(&self) -> Option<&str> {
        match self {
            Self::TotalPagesField { path } => Some(path),
            _ => None,
        }
    }
}

/// Result of checking a stop condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Request the next page
    Continue,
    /// The walk is complete
    Stop,
}

impl StopResult {
    /// Check if we should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// One decoded page: its records in server order plus optional metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records on this page
    pub records: Vec<Record>,
    /// Total page count declared by the server
    pub total_pages: Option<u32>,
    /// Total record count declared by the server
    pub total_count: Option<u64>,
}

impl Page {
    /// Create a page from records only
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Set the declared total page count
    #[must_use]
    pub fn with_total_pages(mut self, total: u32) -> Self {
        self.total_pages = Some(total);
        self
    }

    /// Number of records on the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Tracks a page walk
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// Page index of the request being made (1-based)
    pub page: u32,
    /// Requests issued so far
    pub requests: u32,
    /// Records fetched so far
    pub total_fetched: u64,
    /// Is the walk complete?
    pub done: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            requests: 0,
            total_fetched: 0,
            done: false,
        }
    }
}

impl PaginationState {
    /// Create state positioned on page 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a request for the current page was issued
    pub fn record_request(&mut self) {
        self.requests += 1;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }

    /// Advance to the next page
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Mark the walk as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// Decide whether the walk ends after `page` was fetched at `state.page`
pub fn check_stop_condition(
    condition: &StopCondition,
    page: &Page,
    state: &PaginationState,
) -> Result<StopResult> {
    if page.is_empty() {
        return Ok(StopResult::Stop);
    }

    match condition {
        StopCondition::EmptyPage => Ok(StopResult::Continue),
        StopCondition::TotalPagesField { path } => {
            let total = page.total_pages.ok_or_else(|| {
                Error::record_extraction(path.as_str(), "total page count missing from response")
            })?;
            if state.page >= total {
                Ok(StopResult::Stop)
            } else {
                Ok(StopResult::Continue)
            }
        }
        StopCondition::FixedPageCount { pages } => {
            if state.page >= (*pages).max(1) {
                Ok(StopResult::Stop)
            } else {
                Ok(StopResult::Continue)
            }
        }
    }
}
