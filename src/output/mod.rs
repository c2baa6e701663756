//! Output module
//!
//! Persists harvested collections as JSON files.
//!
//! # Overview
//!
//! - [`PersistenceSink`] - the seam the vendor jobs write through
//! - [`JsonFileSink`] - pretty-printed JSON files in one directory, written
//!   to a temp file and renamed into place

mod sink;

pub use sink::{JsonFileSink, PersistenceSink};
