//! Response decoder module
//!
//! # Overview
//!
//! Response bodies are JSON. The decoder locates the record array with a dot
//! path (or takes the body itself when it is the array) and reads the
//! optional total page and total count fields. A body without the expected
//! shape is a decode failure, never an empty page.

mod decoders;
mod types;

pub use decoders::{lookup_path, JsonDecoder};
pub use types::RecordDecoder;

#[cfg(test)]
mod tests;
