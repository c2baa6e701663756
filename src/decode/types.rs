//! Decoder traits
//!
//! Defines the seam between a raw JSON body and a decoded [`Page`].

use crate::error::Result;
use crate::pagination::Page;
use serde_json::Value;

/// Turns one response body into a page of records
pub trait RecordDecoder: Send + Sync {
    /// Extract the records and pagination metadata from a body
    fn decode_page(&self, body: &Value) -> Result<Page>;
}
