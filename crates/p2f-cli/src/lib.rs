// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use p2f_config_core::{read_config_file, worker_limit_hint, Overrides, PresetStore};
use p2f_config_types::{ConversionConfig, OcrMode, TableMode, VerbosityLevel};
use p2f_logging::CliLoggingArgs;
use std::path::PathBuf;

pub mod config_commands;
pub mod preset_commands;

pub use clap::Parser;

#[derive(clap::Parser)]
#[command(
    name = "p2f",
    about = "PDF2Foundry conversion config tool",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a config is ready for conversion
    Validate {
        #[command(flatten)]
        source: ConfigSourceArgs,
        /// Print violations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print or write the JSON Schema of the config
    Schema {
        /// Write the schema to this file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the backend convert command for a valid config
    Command {
        #[command(flatten)]
        source: ConfigSourceArgs,
        /// Print the argument vector as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Print the effective config
    Show {
        #[command(flatten)]
        source: ConfigSourceArgs,
    },
    /// Manage named presets
    Preset {
        #[command(subcommand)]
        subcommand: preset_commands::PresetCommands,
    },
    /// Check a JSON document against the config schema
    Check {
        /// Document to check
        file: PathBuf,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Validate { source, json } => config_commands::validate(&source, json),
            Commands::Schema { output } => config_commands::schema(output.as_deref()),
            Commands::Command { source, json } => config_commands::command(&source, json),
            Commands::Show { source } => config_commands::show(&source),
            Commands::Preset { subcommand } => subcommand.run(),
            Commands::Check { file } => config_commands::check(&file),
        }
    }
}

/// Where the base config comes from, plus per-field overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSourceArgs {
    /// Read the base config from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub config: Option<PathBuf>,
    /// Start from a saved preset
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

impl ConfigSourceArgs {
    /// Defaults, then the file or preset, then the override flags
    pub fn resolve(&self) -> Result<ConversionConfig> {
        let base = if let Some(path) = &self.config {
            read_config_file(path)?
        } else if let Some(name) = &self.preset {
            PresetStore::open_default()?.load(name)?
        } else {
            ConversionConfig::new()
        };

        let overrides = self.overrides.to_overrides();
        overrides
            .apply(&base)
            .context("applying command-line overrides")
    }
}

fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn workers_help() -> String {
    format!(
        "Parallel workers, at least 1 (suggested at most {} here)",
        worker_limit_hint()
    )
}

fn parse_on_off(value: &str) -> Result<bool, String> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected 'on' or 'off', got '{other}'")),
    }
}

/// Field overrides, named after the backend flags
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Source PDF document
    #[arg(long, value_name = "PATH")]
    pub pdf: Option<PathBuf>,
    #[arg(long)]
    pub mod_id: Option<String>,
    #[arg(long)]
    pub mod_title: Option<String>,
    /// Directory the module is written into
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub license: Option<String>,
    #[arg(long)]
    pub pack_name: Option<String>,
    #[arg(long, overrides_with = "no_toc")]
    pub toc: bool,
    #[arg(long, overrides_with = "toc")]
    pub no_toc: bool,
    #[arg(long, overrides_with = "no_deterministic_ids")]
    pub deterministic_ids: bool,
    #[arg(long, overrides_with = "deterministic_ids")]
    pub no_deterministic_ids: bool,

    #[arg(long, value_enum)]
    pub tables: Option<TableMode>,
    #[arg(long, value_enum)]
    pub ocr: Option<OcrMode>,
    /// Generate picture descriptions with a vision model
    #[arg(long, value_name = "on|off", value_parser = parse_on_off)]
    pub picture_descriptions: Option<bool>,
    #[arg(long)]
    pub vlm_repo_id: Option<String>,

    /// Page selection such as 1,5-10
    #[arg(long)]
    pub pages: Option<String>,
    #[arg(long, allow_negative_numbers = true, help = workers_help())]
    pub workers: Option<i32>,
    #[arg(long, overrides_with = "no_reflow_columns")]
    pub reflow_columns: bool,
    #[arg(long, overrides_with = "reflow_columns")]
    pub no_reflow_columns: bool,

    /// Docling JSON cache file
    #[arg(long, value_name = "PATH")]
    pub docling_json: Option<PathBuf>,
    #[arg(long, overrides_with = "no_write_docling_json")]
    pub write_docling_json: bool,
    #[arg(long, overrides_with = "write_docling_json")]
    pub no_write_docling_json: bool,
    #[arg(long, overrides_with = "no_fallback_on_json_failure")]
    pub fallback_on_json_failure: bool,
    #[arg(long, overrides_with = "fallback_on_json_failure")]
    pub no_fallback_on_json_failure: bool,

    #[arg(long, overrides_with = "no_compile_pack")]
    pub compile_pack: bool,
    #[arg(long, overrides_with = "compile_pack")]
    pub no_compile_pack: bool,

    /// Backend verbosity
    #[arg(long, value_enum)]
    pub verbosity: Option<VerbosityLevel>,
}

impl OverrideArgs {
    pub fn to_overrides(&self) -> Overrides {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());

        let mut o = Overrides::new();
        o.set_opt("core.pdf", path(&self.pdf))
            .set_opt("core.mod_id", self.mod_id.clone())
            .set_opt("core.mod_title", self.mod_title.clone())
            .set_opt("core.out_dir", path(&self.out_dir))
            .set_opt("module.author", self.author.clone())
            .set_opt("module.license", self.license.clone())
            .set_opt("module.pack_name", self.pack_name.clone())
            .set_opt("module.toc", switch(self.toc, self.no_toc))
            .set_opt(
                "module.deterministic_ids",
                switch(self.deterministic_ids, self.no_deterministic_ids),
            )
            .set_opt("conversion.tables", self.tables.map(TableMode::as_str))
            .set_opt("conversion.ocr", self.ocr.map(OcrMode::as_str))
            .set_opt("conversion.picture_descriptions", self.picture_descriptions)
            .set_opt("conversion.vlm_repo_id", self.vlm_repo_id.clone())
            .set_opt("performance.pages", self.pages.clone())
            .set_opt("performance.workers", self.workers)
            .set_opt(
                "performance.reflow_columns",
                switch(self.reflow_columns, self.no_reflow_columns),
            )
            .set_opt("caching.docling_json", path(&self.docling_json))
            .set_opt(
                "caching.write_docling_json",
                switch(self.write_docling_json, self.no_write_docling_json),
            )
            .set_opt(
                "caching.fallback_on_json_failure",
                switch(self.fallback_on_json_failure, self.no_fallback_on_json_failure),
            )
            .set_opt(
                "output.compile_pack",
                switch(self.compile_pack, self.no_compile_pack),
            )
            .set_opt("logging.verbose", self.verbosity.map(VerbosityLevel::as_str));
        o
    }
}
