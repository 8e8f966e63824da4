// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! JSON text form of a conversion config.
//!
//! The text form lists sections and fields in declaration order with enums
//! encoded by their string value. Reading is tolerant: missing sections or
//! fields take their defaults and unknown keys are ignored, so presets written
//! by older or newer releases still load. Values outside a field's type are
//! rejected with the dotted field path.

use crate::error::DeserializationError;
use p2f_config_types::ConversionConfig;
use serde_json::Value as J;
use serde_path_to_error::{Path as FieldPath, Segment};

/// Structured JSON value of `config`
pub fn to_value(config: &ConversionConfig) -> Result<J, serde_json::Error> {
    serde_json::to_value(config)
}

/// Pretty-printed JSON text of `config`
pub fn to_text(config: &ConversionConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(config)
}

/// Parse a config from JSON text
pub fn from_text(text: &str) -> Result<ConversionConfig, DeserializationError> {
    let value: J = serde_json::from_str(text).map_err(DeserializationError::Malformed)?;
    from_value(&value)
}

/// Rebuild a config from an already-parsed JSON value
pub fn from_value(value: &J) -> Result<ConversionConfig, DeserializationError> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let field = if err.path().iter().next().is_none() {
            "(root)".to_string()
        } else {
            err.path().to_string()
        };
        let offending = value_at(value, err.path())
            .map(ToString::to_string)
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::debug!(%field, value = %offending, "rejected config document");
        DeserializationError::InvalidValue {
            field,
            value: offending,
            reason: err.into_inner().to_string(),
        }
    })
}

fn value_at<'a>(root: &'a J, path: &FieldPath) -> Option<&'a J> {
    let mut cur = root;
    for segment in path.iter() {
        cur = match segment {
            Segment::Map { key } => cur.get(key.as_str())?,
            Segment::Seq { index } => cur.get(*index)?,
            _ => return None,
        };
    }
    Some(cur)
}
