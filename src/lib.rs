// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # ats-harvest
//!
//! Walks paginated recruiting-platform (ATS) APIs page by page, joins the
//! collections in memory and writes them to local JSON files.
//!
//! ## Features
//!
//! - **One harvester for every vendor**: a [`ResourceDescriptor`] says where a
//!   collection lives and how its pages end; [`Harvester`] walks it
//! - **Partial results instead of lost work**: a failing page stops the walk
//!   and the records fetched so far come back marked incomplete
//! - **Keyed fan-out**: one harvest per job, vacancy or candidate with bounded
//!   concurrency, results in key order
//! - **Vendor jobs**: Bizneo, Greenhouse, Gupy, PandaPe, Recruitee and Lever
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ats_harvest::{Harvester, HttpClient, ResourceDescriptor, StopCondition};
//!
//! # async fn example() -> ats_harvest::Result<()> {
//! let harvester = Harvester::new(HttpClient::new()?);
//! let jobs = ResourceDescriptor::new("https://api.gupy.io/api/v1", "jobs")
//!     .records_path("results")
//!     .stop_condition(StopCondition::total_pages("totalPages"));
//!
//! let result = harvester.harvest(&jobs).await;
//! println!("{} jobs, complete: {}", result.len(), result.completed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  cli → vendors (bizneo, greenhouse, gupy, pandape, ...)       │
//! └───────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬───────────┐
//! │   Auth   │   HTTP    │   Harvest     │   Join    │  Output   │
//! ├──────────┼───────────┼───────────────┼───────────┼───────────┤
//! │ Bearer   │ Transport │ Pagination    │ Lookup    │ JSON file │
//! │ Basic    │ Retry     │ Decode        │ index     │ sink      │
//! │ Header   │ Rate Limit│ Keyed fan-out │           │           │
//! │ OAuth2   │ Backoff   │               │           │           │
//! └──────────┴───────────┴───────────────┴───────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication header providers
pub mod auth;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Resource descriptors and stop conditions
pub mod pagination;

/// Record extraction from response bodies
pub mod decode;

/// The paginated harvester
pub mod harvest;

/// In-memory joins between collections
pub mod join;

/// JSON file output
pub mod output;

/// Harvest configuration and credentials
pub mod config;

/// Template interpolation
pub mod template;

/// Vendor jobs
pub mod vendors;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use harvest::{HarvestResult, Harvester, KeyedHarvest};
pub use http::{HttpClient, Transport};
pub use pagination::{ResourceDescriptor, StopCondition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
