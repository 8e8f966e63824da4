// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Translation of a config into the backend `convert` invocation.
//!
//! Token order is stable for a given config: the source document first, then
//! module, conversion, performance, caching and output flags, then the
//! verbosity flags. Boolean options are always spelled out as an enable or
//! disable flag so the rendered command documents every choice.

use p2f_config_types::ConversionConfig;
use serde::Serialize;
use std::path::Path;

/// Backend executable name
pub const BACKEND_PROGRAM: &str = "pdf2foundry";

/// Backend subcommand performing the conversion
pub const CONVERT_SUBCOMMAND: &str = "convert";

fn toggle(enabled: bool, on: &str, off: &str) -> String {
    if enabled { on } else { off }.to_string()
}

fn push_pair(args: &mut Vec<String>, flag: &str, value: impl Into<String>) {
    args.push(flag.to_string());
    args.push(value.into());
}

/// Exact text of `path`; only lossy for paths the validator rejects as non UTF-8
fn path_token(path: &Path) -> String {
    match path.to_str() {
        Some(text) => text.to_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// Ordered argument tokens following `pdf2foundry convert`
pub fn synthesize_args(config: &ConversionConfig) -> Vec<String> {
    let mut args = Vec::with_capacity(40);

    let core = &config.core;
    args.push(path_token(&core.pdf));
    push_pair(&mut args, "--mod-id", core.mod_id.as_str());
    push_pair(&mut args, "--mod-title", core.mod_title.as_str());

    let module = &config.module;
    push_pair(&mut args, "--author", module.author.as_str());
    push_pair(&mut args, "--license", module.license.as_str());
    push_pair(&mut args, "--pack-name", config.resolved_pack_name());
    args.push(toggle(module.toc, "--toc", "--no-toc"));
    args.push(toggle(
        module.deterministic_ids,
        "--deterministic-ids",
        "--no-deterministic-ids",
    ));

    let conversion = &config.conversion;
    push_pair(&mut args, "--tables", conversion.tables.as_str());
    push_pair(&mut args, "--ocr", conversion.ocr.as_str());
    push_pair(
        &mut args,
        "--picture-descriptions",
        if conversion.picture_descriptions { "on" } else { "off" },
    );
    if conversion.picture_descriptions {
        push_pair(&mut args, "--vlm-repo-id", conversion.vlm_repo_id.as_str());
    }

    let performance = &config.performance;
    if !performance.pages.trim().is_empty() {
        push_pair(&mut args, "--pages", performance.pages.trim());
    }
    push_pair(&mut args, "--workers", performance.workers.to_string());
    args.push(toggle(
        performance.reflow_columns,
        "--reflow-columns",
        "--no-reflow-columns",
    ));

    let caching = &config.caching;
    if let Some(path) = caching.cache_path() {
        push_pair(&mut args, "--docling-json", path_token(path));
    }
    args.push(toggle(
        caching.write_docling_json,
        "--write-docling-json",
        "--no-write-docling-json",
    ));
    args.push(toggle(
        caching.fallback_on_json_failure,
        "--fallback-on-json-failure",
        "--no-fallback-on-json-failure",
    ));

    push_pair(&mut args, "--out-dir", path_token(&core.out_dir));
    args.push(toggle(
        config.output.compile_pack,
        "--compile-pack",
        "--no-compile-pack",
    ));

    for _ in 0..config.logging.verbose.flag_count() {
        args.push("-v".to_string());
    }

    args
}

/// A backend command line, ready to hand to a process runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub subcommand: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn for_config(config: &ConversionConfig) -> Self {
        Self {
            program: BACKEND_PROGRAM.to_string(),
            subcommand: CONVERT_SUBCOMMAND.to_string(),
            args: synthesize_args(config),
        }
    }

    /// Full argument vector including the program name
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(self.program.clone());
        argv.push(self.subcommand.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Shell-quoted rendering for display; never executed
    pub fn transcript(&self) -> String {
        shell_words::join(self.argv())
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.transcript())
    }
}
