// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Operations over a PDF2Foundry `ConversionConfig`.
//!
//! Everything here is synchronous and takes the config by reference:
//! readiness validation, schema generation and checking, the JSON text form,
//! layered overrides, backend command synthesis and the named preset store.
//! Violations are returned as values; only I/O and malformed documents
//! produce errors.

pub mod command;
pub mod error;
pub mod fs_probe;
pub mod loader;
pub mod merge;
pub mod pages;
pub mod paths;
pub mod presets;
pub mod schema;
pub mod serialize;
pub mod validate;

pub use command::{synthesize_args, Invocation, BACKEND_PROGRAM, CONVERT_SUBCOMMAND};
pub use error::{
    ConfigFileError, DeserializationError, InvalidConfig, PresetError, SchemaCheckError,
};
pub use fs_probe::{FsProbe, HostFs};
pub use loader::{check_document, parse_document, read_config_file};
pub use merge::{insert_dotted, merge_two_json, Overrides};
pub use pages::{check_page_selection, parse_page_range, PageRangeError, MAX_SELECTED_PAGES};
pub use presets::{sanitize_preset_name, PresetStore};
pub use schema::{generate_schema, schema_text, FieldSpec, FieldType};
pub use serialize::{from_text, from_value, to_text, to_value};
pub use validate::{
    is_valid_module_id, validate_caching, validate_config, validate_config_with, validate_conversion,
    validate_core, validate_performance, worker_limit_hint, ValidationReport, Violation,
};

pub use p2f_config_types as types;
