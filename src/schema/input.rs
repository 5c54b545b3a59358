//! Raw input mappings
//!
//! The engine never parses request bytes. Callers hand it a mapping from
//! key to an already tokenized JSON value, typically obtained with
//! `serde_json::from_str::<HashMap<String, Box<RawValue>>>(body)`.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::value::RawValue;

/// A key to raw JSON value lookup
pub trait RawInput {
    /// Returns the raw value stored under `key`
    fn raw(&self, key: &str) -> Option<&RawValue>;
}

impl<S: BuildHasher> RawInput for HashMap<String, Box<RawValue>, S> {
    fn raw(&self, key: &str) -> Option<&RawValue> {
        self.get(key).map(|v| &**v)
    }
}

impl<S: BuildHasher> RawInput for HashMap<String, &RawValue, S> {
    fn raw(&self, key: &str) -> Option<&RawValue> {
        self.get(key).copied()
    }
}

impl RawInput for BTreeMap<String, Box<RawValue>> {
    fn raw(&self, key: &str) -> Option<&RawValue> {
        self.get(key).map(|v| &**v)
    }
}

impl RawInput for BTreeMap<String, &RawValue> {
    fn raw(&self, key: &str) -> Option<&RawValue> {
        self.get(key).copied()
    }
}
