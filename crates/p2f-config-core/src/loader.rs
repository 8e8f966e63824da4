// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Config document loading and schema checking

use crate::error::{ConfigFileError, DeserializationError, SchemaCheckError};
use crate::schema::generate_schema;
use crate::serialize::from_value;
use p2f_config_types::ConversionConfig;
use serde_json::Value as J;
use std::path::Path;

/// Check a JSON document against the generated schema, reporting every error
pub fn check_document(v: &J) -> Result<(), SchemaCheckError> {
    use jsonschema::{Draft, JSONSchema};
    use std::sync::OnceLock;

    static SCHEMA: OnceLock<J> = OnceLock::new();
    let schema = SCHEMA.get_or_init(generate_schema);

    static VALIDATOR: OnceLock<JSONSchema> = OnceLock::new();
    let validator = VALIDATOR.get_or_init(|| {
        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .expect("generated schema compiles")
    });

    if let Err(errors) = validator.validate(v) {
        let errors: Vec<String> = errors
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();
        tracing::debug!(count = errors.len(), "document failed schema check");
        return Err(SchemaCheckError { errors });
    }

    Ok(())
}

/// Parse JSON text into a value without interpreting it as a config
pub fn parse_document(text: &str) -> Result<J, DeserializationError> {
    serde_json::from_str(text).map_err(DeserializationError::Malformed)
}

/// Read, schema-check and deserialize a config file
pub fn read_config_file(path: &Path) -> Result<ConversionConfig, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let json = parse_document(&content).map_err(|source| ConfigFileError::Deserialization {
        path: path.to_path_buf(),
        source,
    })?;
    check_document(&json).map_err(|source| ConfigFileError::Schema {
        path: path.to_path_buf(),
        source,
    })?;

    let config = from_value(&json).map_err(|source| ConfigFileError::Deserialization {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
