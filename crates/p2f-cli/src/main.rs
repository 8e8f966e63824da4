// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use p2f_cli::{Cli, Parser};
use p2f_logging::Level;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.logging.init("p2f", Level::WARN)?;
    cli.run()
}
