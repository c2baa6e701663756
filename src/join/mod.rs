//! In-memory joins between harvested collections
//!
//! Both joins build an id→value [`LookupIndex`] once and then walk the
//! target records, so a join costs O(n+m). A key that is not in the index
//! sets the joined field to `null`.
//!
//! ```
//! use ats_harvest::join::{attach_field, LookupIndex};
//! use serde_json::json;
//!
//! let recruiters = vec![json!({"id": 5, "email": "a@x.com"})];
//! let mut jobs = vec![json!({"id": 10, "owner_id": 5})];
//!
//! let emails = LookupIndex::build(&recruiters, "id", "email");
//! attach_field(&mut jobs, "owner_id", &emails, "owner_email");
//!
//! assert_eq!(jobs[0]["owner_email"], "a@x.com");
//! ```

use crate::decode::lookup_path;
use serde_json::Value;
use std::collections::HashMap;

/// Normalized join key: strings as-is, numbers by their decimal text
pub fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Mapping from a normalized key to a value
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    entries: HashMap<String, Value>,
}

impl LookupIndex {
    /// Index `records` by the value at `key_path`, mapping to the value at
    /// `value_path`. The first record with a given key wins.
    pub fn build(records: &[Value], key_path: &str, value_path: &str) -> Self {
        let mut index = Self::default();
        for record in records {
            index.insert_from(record, key_path, value_path);
        }
        index
    }

    /// Like [`LookupIndex::build`], but over the elements of the list found at
    /// `list_path` inside each record (e.g. every stage of every pipeline)
    pub fn build_nested(
        records: &[Value],
        list_path: &str,
        key_path: &str,
        value_path: &str,
    ) -> Self {
        let mut index = Self::default();
        let items = records
            .iter()
            .filter_map(|record| lookup_path(record, list_path))
            .filter_map(Value::as_array)
            .flatten();
        for item in items {
            index.insert_from(item, key_path, value_path);
        }
        index
    }

    fn insert_from(&mut self, record: &Value, key_path: &str, value_path: &str) {
        let Some(key) = lookup_path(record, key_path).and_then(key_of) else {
            return;
        };
        let value = lookup_path(record, value_path).cloned().unwrap_or(Value::Null);
        self.entries.entry(key).or_insert(value);
    }

    /// Value for a key
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(&key_of(key)?)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Set `target` on every object in `records` to the indexed value for the
/// record's `key_path`, or `null` when there is none
pub fn attach_field(records: &mut [Value], key_path: &str, index: &LookupIndex, target: &str) {
    for record in records {
        let joined = lookup_path(record, key_path)
            .and_then(|key| index.get(key))
            .cloned()
            .unwrap_or(Value::Null);
        if let Value::Object(map) = record {
            map.insert(target.to_string(), joined);
        }
    }
}

/// [`attach_field`] applied to the elements of the list at `list_path`
/// inside each record (e.g. each placement of each candidate)
pub fn attach_nested(
    records: &mut [Value],
    list_path: &str,
    key_path: &str,
    index: &LookupIndex,
    target: &str,
) {
    for record in records {
        if let Some(Value::Array(items)) = lookup_path_mut(record, list_path) {
            attach_field(items, key_path, index, target);
        }
    }
}

fn lookup_path_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.')
        .try_fold(value, |current, part| current.get_mut(part))
}
