// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for loading, checking and storing conversion configs

use crate::validate::Violation;
use std::path::PathBuf;
use thiserror::Error;

/// A config document that cannot be turned back into a `ConversionConfig`
#[derive(Debug, Error)]
pub enum DeserializationError {
    /// The text is not JSON at all
    #[error("config document is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// A field holds a value outside its type, e.g. an unknown table mode
    #[error("invalid value {value} for field '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the field, e.g. `conversion.tables`
        field: String,
        /// The offending value as it appeared in the document
        value: String,
        reason: String,
    },
}

/// A convert action refused because the config is not ready
#[derive(Debug, Clone, Error)]
#[error("configuration is not ready for conversion:\n  - {}", format_violations(.violations))]
pub struct InvalidConfig {
    pub violations: Vec<Violation>,
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n  - ")
}

/// Structural mismatch between a document and the generated schema
#[derive(Debug, Clone, Error)]
#[error("config schema validation failed:\n  - {}", .errors.join("\n  - "))]
pub struct SchemaCheckError {
    pub errors: Vec<String>,
}

/// Errors raised by the preset store
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("invalid preset name: '{0}'")]
    InvalidName(String),

    #[error("preset '{0}' already exists")]
    AlreadyExists(String),

    #[error("preset '{0}' not found")]
    NotFound(String),

    #[error("could not determine the presets directory")]
    NoPresetsDir,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preset '{name}' cannot be written as JSON: {source}")]
    Serialization {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("preset file {path} is invalid: {source}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: DeserializationError,
    },
}

impl PresetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PresetError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to read a config document from disk
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} does not match the schema: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaCheckError,
    },

    #[error("config file {path} is invalid: {source}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: DeserializationError,
    },
}
