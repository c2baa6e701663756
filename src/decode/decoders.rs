//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use crate::pagination::{Page, ResourceDescriptor};
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record and metadata paths
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Path to the record array; `None` means the body is the array
    records_path: Option<String>,
    /// Path to the total page count
    total_pages_path: Option<String>,
    /// Path to the total record count
    total_count_path: Option<String>,
}

impl JsonDecoder {
    /// Create a decoder that expects the body to be the record array
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            records_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Require a total page count at `path`
    #[must_use]
    pub fn with_total_pages_path(mut self, path: impl Into<String>) -> Self {
        self.total_pages_path = Some(path.into());
        self
    }

    /// Read an optional total record count at `path`
    #[must_use]
    pub fn with_total_count_path(mut self, path: impl Into<String>) -> Self {
        self.total_count_path = Some(path.into());
        self
    }

    /// Build the decoder a descriptor calls for
    pub fn for_descriptor(descriptor: &ResourceDescriptor) -> Self {
        Self {
            records_path: descriptor.records_path.clone(),
            total_pages_path: descriptor
                .stop_condition
                .total_pages_path()
                .map(str::to_string),
            total_count_path: descriptor.total_count_path.clone(),
        }
    }

    fn extract_records(&self, body: &Value) -> Result<Vec<Value>> {
        match &self.records_path {
            Some(path) => match lookup_path(body, path) {
                Some(Value::Array(records)) => Ok(records.clone()),
                Some(other) => Err(Error::record_extraction(
                    path.as_str(),
                    format!("expected an array, found {}", type_name(other)),
                )),
                None => Err(Error::record_extraction(path.as_str(), "path not found")),
            },
            None => match body {
                Value::Array(records) => Ok(records.clone()),
                other => Err(Error::decode(format!(
                    "expected the body to be an array, found {}",
                    type_name(other)
                ))),
            },
        }
    }

    fn extract_total_pages(&self, body: &Value) -> Result<Option<u32>> {
        let Some(path) = &self.total_pages_path else {
            return Ok(None);
        };
        let value = lookup_path(body, path)
            .ok_or_else(|| Error::record_extraction(path.as_str(), "total page count not found"))?;
        as_unsigned(value)
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                Error::record_extraction(
                    path.as_str(),
                    format!("total page count is not an unsigned integer: {value}"),
                )
            })
    }

    fn extract_total_count(&self, body: &Value) -> Option<u64> {
        let path = self.total_count_path.as_ref()?;
        lookup_path(body, path).and_then(as_unsigned)
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode_page(&self, body: &Value) -> Result<Page> {
        Ok(Page {
            records: self.extract_records(body)?,
            total_pages: self.extract_total_pages(body)?,
            total_count: self.extract_total_count(body),
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Follow a dot path (optionally `$.`-prefixed, with `[n]` array indexing)
/// into a JSON value
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match part.find('[') {
            Some(bracket_pos) => {
                let name = &part[..bracket_pos];
                let index_str = part[bracket_pos + 1..].strip_suffix(']')?;
                if !name.is_empty() {
                    current = current.get(name)?;
                }
                let index: usize = index_str.parse().ok()?;
                current = current.as_array()?.get(index)?;
            }
            None => current = current.get(part)?,
        }
    }

    Some(current)
}

fn as_unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
