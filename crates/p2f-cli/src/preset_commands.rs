// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

//! Preset management commands
use crate::ConfigSourceArgs;
use anyhow::Result;
use clap::Subcommand;
use p2f_config_core::{to_text, PresetStore};

#[derive(Subcommand)]
pub enum PresetCommands {
    /// List saved presets
    List,
    /// Save the effective config under a name
    Save {
        /// Preset name
        name: String,
        /// Replace an existing preset with the same name
        #[arg(long)]
        overwrite: bool,
        #[command(flatten)]
        source: ConfigSourceArgs,
    },
    /// Print a saved preset
    Load {
        /// Preset name
        name: String,
    },
    /// Delete a saved preset
    Delete {
        /// Preset name
        name: String,
    },
}

impl PresetCommands {
    pub fn run(self) -> Result<()> {
        let store = PresetStore::open_default()?;
        match self {
            PresetCommands::List => {
                for name in store.list()? {
                    println!("{name}");
                }
            }
            PresetCommands::Save {
                name,
                overwrite,
                source,
            } => {
                let config = source.resolve()?;
                let path = store.save(&name, &config, overwrite)?;
                println!("Saved preset '{}' to {}", name, path.display());
            }
            PresetCommands::Load { name } => {
                let config = store.load(&name)?;
                println!("{}", to_text(&config)?);
            }
            PresetCommands::Delete { name } => {
                store.delete(&name)?;
                println!("Deleted preset '{name}'");
            }
        }
        Ok(())
    }
}
