// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Conversion config sections and their aggregate.
//!
//! Every section is a flat record whose fields all carry a documented default,
//! so `ConversionConfig::default()` is always a complete instance. Defaults are
//! built by constructor calls, never shared between instances.

use crate::enums::{OcrMode, TableMode, VerbosityLevel};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output directory used when none is chosen
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Suffix appended to the module id when no pack name is given
pub const PACK_NAME_SUFFIX: &str = "-journals";

/// Worker count used when none is chosen
pub const DEFAULT_WORKERS: i32 = 1;

/// Section keys of the aggregate, in declaration order
pub const SECTION_NAMES: [&str; 7] = [
    "core",
    "module",
    "conversion",
    "performance",
    "caching",
    "output",
    "logging",
];

/// Inputs the backend cannot run without
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSection {
    /// Source PDF
    pub pdf: PathBuf,
    /// Module identifier (slug)
    pub mod_id: String,
    /// Module display title
    pub mod_title: String,
    /// Directory the module is written into
    pub out_dir: PathBuf,
}

impl Default for CoreSection {
    fn default() -> Self {
        Self {
            pdf: PathBuf::new(),
            mod_id: String::new(),
            mod_title: String::new(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl CoreSection {
    /// Names of required fields that are still empty, in declaration order
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.pdf.as_os_str().is_empty() {
            missing.push("pdf");
        }
        if self.mod_id.is_empty() {
            missing.push("mod_id");
        }
        if self.mod_title.trim().is_empty() {
            missing.push("mod_title");
        }
        missing
    }
}

/// Module manifest metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSection {
    pub author: String,
    pub license: String,
    /// Compendium pack name; blank means `<mod_id>-journals`
    pub pack_name: String,
    /// Generate a table-of-contents journal
    pub toc: bool,
    /// Derive stable ids from content so re-runs produce identical output
    pub deterministic_ids: bool,
}

impl Default for ModuleSection {
    fn default() -> Self {
        Self {
            author: String::new(),
            license: String::new(),
            pack_name: String::new(),
            toc: true,
            deterministic_ids: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSection {
    pub tables: TableMode,
    pub ocr: OcrMode,
    /// Generate picture descriptions with a vision-language model
    pub picture_descriptions: bool,
    /// Vision-language model repository; only read when `picture_descriptions` is set
    pub vlm_repo_id: String,
}

impl Default for ConversionSection {
    fn default() -> Self {
        Self {
            tables: TableMode::default(),
            ocr: OcrMode::default(),
            picture_descriptions: false,
            vlm_repo_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSection {
    /// Page selection such as `1,5-10`; empty means all pages
    pub pages: String,
    pub workers: i32,
    /// Reflow multi-column layouts into a single column
    pub reflow_columns: bool,
}

impl Default for PerformanceSection {
    fn default() -> Self {
        Self {
            pages: String::new(),
            workers: DEFAULT_WORKERS,
            reflow_columns: false,
        }
    }
}

/// Docling JSON cache options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachingSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docling_json: Option<PathBuf>,
    pub write_docling_json: bool,
    pub fallback_on_json_failure: bool,
}

impl Default for CachingSection {
    fn default() -> Self {
        Self {
            docling_json: None,
            write_docling_json: false,
            fallback_on_json_failure: true,
        }
    }
}

impl CachingSection {
    /// Cache path, treating an empty path the same as none
    pub fn cache_path(&self) -> Option<&PathBuf> {
        self.docling_json.as_ref().filter(|p| !p.as_os_str().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Compile the pack to LevelDB right after conversion
    pub compile_pack: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub verbose: VerbosityLevel,
}

/// Every adjustable conversion option, grouped into seven sections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub core: CoreSection,
    pub module: ModuleSection,
    pub conversion: ConversionSection,
    pub performance: PerformanceSection,
    pub caching: CachingSection,
    pub output: OutputSection,
    pub logging: LoggingSection,
}

impl ConversionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack name handed to the backend: the explicit one, or `<mod_id>-journals`
    pub fn resolved_pack_name(&self) -> String {
        let explicit = self.module.pack_name.trim();
        if explicit.is_empty() {
            format!("{}{}", self.core.mod_id, PACK_NAME_SUFFIX)
        } else {
            explicit.to_string()
        }
    }
}
