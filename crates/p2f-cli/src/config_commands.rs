// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

//! Config inspection commands
use crate::ConfigSourceArgs;
use anyhow::{Context, Result};
use p2f_config_core::{
    check_document, parse_document, schema_text, to_text, worker_limit_hint, Invocation,
    ValidationReport,
};
use std::path::Path;

pub fn validate(source: &ConfigSourceArgs, json: bool) -> Result<()> {
    let config = source.resolve()?;
    let report = ValidationReport::for_config(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report.violations)?);
    } else {
        let hint = worker_limit_hint();
        if config.performance.workers > hint {
            eprintln!(
                "note: {} workers is above the suggested limit of {hint} for this machine",
                config.performance.workers
            );
        }
        if report.is_ok() {
            println!("Configuration is ready for conversion");
        }
    }

    report.into_result()?;
    Ok(())
}

pub fn schema(output: Option<&Path>) -> Result<()> {
    let text = schema_text();
    match output {
        Some(path) => {
            std::fs::write(path, format!("{text}\n"))
                .with_context(|| format!("writing schema to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote config schema");
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub fn command(source: &ConfigSourceArgs, json: bool) -> Result<()> {
    let config = source.resolve()?;
    ValidationReport::for_config(&config)
        .into_result()
        .context("refusing to build the convert command")?;

    let invocation = Invocation::for_config(&config);
    if json {
        println!("{}", serde_json::to_string(&invocation.argv())?);
    } else {
        println!("{}", invocation.transcript());
    }
    Ok(())
}

pub fn show(source: &ConfigSourceArgs) -> Result<()> {
    let config = source.resolve()?;
    println!("{}", to_text(&config)?);
    Ok(())
}

pub fn check(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let document = parse_document(&content).with_context(|| format!("parsing {}", file.display()))?;
    check_document(&document).with_context(|| format!("checking {}", file.display()))?;
    println!("{}: ok", file.display());
    Ok(())
}
