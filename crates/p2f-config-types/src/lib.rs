// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Strongly-typed conversion options for the PDF2Foundry front end.
//!
//! This crate only describes shape and defaults. Validation, schema
//! generation, serialization and command synthesis live in `p2f-config-core`
//! and take a `ConversionConfig` by reference.

pub mod config;
pub mod enums;

pub use config::{
    CachingSection, ConversionConfig, ConversionSection, CoreSection, LoggingSection,
    ModuleSection, OutputSection, PerformanceSection, DEFAULT_OUT_DIR, PACK_NAME_SUFFIX,
    SECTION_NAMES,
};
pub use enums::{OcrMode, ParseEnumError, TableMode, VerbosityLevel};
