// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Per-user directory discovery

use std::path::PathBuf;

/// Environment variable overriding the per-user data directory
pub const HOME_ENV_VAR: &str = "P2F_HOME";

/// Application directory name under the platform config directory
pub const APP_DIR_NAME: &str = "pdf2foundry";

/// Per-user application directory: `P2F_HOME` if set, else the platform config dir
pub fn user_data_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Directory holding one JSON file per named preset
pub fn presets_dir() -> Option<PathBuf> {
    user_data_dir().map(|dir| dir.join("presets"))
}
