//! Harvest types
//!
//! The outcome of one page walk, its statistics and its serializable summary.

use crate::error::{Error, FailureKind, Result};
use crate::types::Record;
use serde::Serialize;

/// Why a walk stopped early
#[derive(Debug)]
pub struct HarvestFailure {
    /// Page index whose request or decode failed
    pub page: u32,
    /// The typed cause
    pub error: Error,
}

/// Statistics from one walk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestStats {
    /// Requests issued, including a failed one
    pub requests: u32,
    /// Pages successfully decoded
    pub pages: u32,
    /// Records accumulated
    pub records: usize,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

/// Records gathered by one walk, tagged complete or partial
///
/// Built once per walk and handed to the caller unchanged. Zero records with
/// `completed = false` means the walk failed; zero records with
/// `completed = true` means the collection is empty.
#[derive(Debug)]
pub struct HarvestResult {
    /// Name of the harvested resource
    pub resource: String,
    /// Records in server order
    pub records: Vec<Record>,
    /// Whether the walk reached its stop condition
    pub completed: bool,
    /// Set when the walk stopped on an error
    pub failure: Option<HarvestFailure>,
    /// Walk statistics
    pub stats: HarvestStats,
}

impl HarvestResult {
    /// A walk that reached its stop condition
    pub fn complete(
        resource: impl Into<String>,
        records: Vec<Record>,
        stats: HarvestStats,
    ) -> Self {
        Self {
            resource: resource.into(),
            records,
            completed: true,
            failure: None,
            stats,
        }
    }

    /// A walk that stopped on an error at `page`
    pub fn partial(
        resource: impl Into<String>,
        records: Vec<Record>,
        page: u32,
        error: Error,
        stats: HarvestStats,
    ) -> Self {
        Self {
            resource: resource.into(),
            records,
            completed: false,
            failure: Some(HarvestFailure { page, error }),
            stats,
        }
    }

    /// Check if the walk finished
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Failed before any record was gathered
    pub fn is_total_failure(&self) -> bool {
        !self.completed && self.records.is_empty()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were gathered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Human-readable failure reason
    pub fn failure_reason(&self) -> Option<String> {
        self.failure
            .as_ref()
            .map(|f| format!("page {}: {}", f.page, f.error))
    }

    /// The records if the walk finished, otherwise an
    /// [`Error::IncompleteHarvest`] carrying what was gathered
    pub fn into_complete(self) -> Result<Vec<Record>> {
        self.require_complete().map(|result| result.records)
    }

    /// This result if the walk finished, otherwise an
    /// [`Error::IncompleteHarvest`] carrying what was gathered
    pub fn require_complete(self) -> Result<Self> {
        if self.completed {
            return Ok(self);
        }
        let cause = match self.failure {
            Some(failure) => failure.error,
            None => Error::Other("walk did not finish".to_string()),
        };
        Err(Error::incomplete_harvest(self.resource, self.records, cause))
    }

    /// Serializable summary of this result
    pub fn summary(&self) -> HarvestSummary {
        HarvestSummary {
            resource: self.resource.clone(),
            records: self.records.len(),
            completed: self.completed,
            failure: self.failure.as_ref().map(|f| FailureSummary {
                page: f.page,
                kind: f.error.kind(),
                status: f.error.status(),
                message: f.error.to_string(),
            }),
            requests: self.stats.requests,
            duration_ms: self.stats.duration_ms,
        }
    }
}

/// A walk run for one key of a fan-out
#[derive(Debug)]
pub struct KeyedHarvest<K> {
    /// The key the walk was built from
    pub key: K,
    /// Its result
    pub result: HarvestResult,
}

/// Summary of a walk, printed and logged by the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestSummary {
    /// Resource name
    pub resource: String,
    /// Records gathered
    pub records: usize,
    /// Whether the walk finished
    pub completed: bool,
    /// Failure details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureSummary>,
    /// Requests issued
    pub requests: u32,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

/// Failure details inside a [`HarvestSummary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureSummary {
    /// Page that failed
    pub page: u32,
    /// Failure class
    pub kind: FailureKind,
    /// HTTP status, when the failure was a status error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Error message
    pub message: String,
}
