// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layering of config documents: defaults, then a file or preset, then flags

use crate::error::DeserializationError;
use crate::serialize::{from_value, to_value};
use p2f_config_types::ConversionConfig;
use serde_json::{Map, Value as J};

/// Merge two JSON values with deep object merging and array replacement
///
/// Objects are merged recursively, scalars/arrays replace the left value.
pub fn merge_two_json(base: &mut J, layer: J) {
    match (base, layer) {
        (J::Object(a), J::Object(b)) => {
            for (k, v) in b {
                merge_two_json(a.entry(k).or_insert(J::Null), v);
            }
        }
        (a @ J::Array(_), J::Array(b)) => *a = J::Array(b),
        (_, J::Null) => {}
        (a, b) => *a = b,
    }
}

/// Insert a value at a dotted path such as `performance.workers`
pub fn insert_dotted(root: &mut J, dotted: &str, v: J) {
    let mut parts: Vec<&str> = dotted.split('.').collect();
    let Some(final_key) = parts.pop() else {
        return;
    };

    let mut cur = root;
    for p in parts {
        if !cur.is_object() {
            *cur = J::Object(Map::new());
        }
        cur = match cur {
            J::Object(map) => map.entry(p).or_insert_with(|| J::Object(Map::new())),
            _ => return,
        };
    }

    if !cur.is_object() {
        *cur = J::Object(Map::new());
    }
    if let J::Object(map) = cur {
        map.insert(final_key.into(), v);
    }
}

/// Field overrides collected from the command line, applied last
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    layer: J,
}

impl Overrides {
    pub fn new() -> Self {
        Self {
            layer: J::Object(Map::new()),
        }
    }

    /// Record `value` for the dotted field path
    pub fn set(&mut self, dotted: &str, value: impl Into<J>) -> &mut Self {
        if self.layer.is_null() {
            self.layer = J::Object(Map::new());
        }
        insert_dotted(&mut self.layer, dotted, value.into());
        self
    }

    /// Record `value` only when present
    pub fn set_opt<T: Into<J>>(&mut self, dotted: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(dotted, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.layer.as_object().map_or(true, Map::is_empty)
    }

    pub fn as_json(&self) -> &J {
        &self.layer
    }

    /// Apply the overrides on top of `base`, re-checking every field type
    pub fn apply(&self, base: &ConversionConfig) -> Result<ConversionConfig, DeserializationError> {
        if self.is_empty() {
            return Ok(base.clone());
        }
        let mut merged = to_value(base).map_err(DeserializationError::Malformed)?;
        merge_two_json(&mut merged, self.layer.clone());
        tracing::debug!(overrides = %self.layer, "applying config overrides");
        from_value(&merged)
    }
}
