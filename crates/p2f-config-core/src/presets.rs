// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Named presets stored as one JSON document per file.
//!
//! A preset file holds exactly the serializer's text form of a config. Preset
//! names are mapped to filesystem-safe stems with [`sanitize_preset_name`], so
//! `"My Preset"` and `"my-preset"` address the same file.

use crate::error::PresetError;
use crate::paths::presets_dir;
use crate::serialize::{from_text, to_text};
use p2f_config_types::ConversionConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of preset documents
pub const PRESET_EXTENSION: &str = "json";

/// Stem used when a name has no usable characters left
const FALLBACK_STEM: &str = "preset";

/// Turn a human-readable preset name into a safe file stem
pub fn sanitize_preset_name(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    let mut collapsed = String::with_capacity(kept.len());
    for c in kept.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whole-file preset storage rooted at one directory
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: PathBuf,
}

impl PresetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at the per-user presets directory (`P2F_HOME` aware)
    pub fn open_default() -> Result<Self, PresetError> {
        presets_dir().map(Self::new).ok_or(PresetError::NoPresetsDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the preset called `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(sanitize_preset_name(name))
            .with_extension(PRESET_EXTENSION)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Save `config` under `name`; refuses to replace an existing preset unless `overwrite`
    pub fn save(
        &self,
        name: &str,
        config: &ConversionConfig,
        overwrite: bool,
    ) -> Result<PathBuf, PresetError> {
        if name.trim().is_empty() {
            return Err(PresetError::InvalidName(name.to_string()));
        }

        let path = self.path_for(name);
        if path.exists() && !overwrite {
            return Err(PresetError::AlreadyExists(name.to_string()));
        }

        fs::create_dir_all(&self.dir).map_err(|e| PresetError::io(&self.dir, e))?;

        let content = to_text(config).map_err(|source| PresetError::Serialization {
            name: name.to_string(),
            source,
        })?;

        // Write to a sibling temp file, then rename over the target
        let temp_file = path.with_extension("json.tmp");
        fs::write(&temp_file, content).map_err(|e| PresetError::io(&temp_file, e))?;
        if let Err(e) = fs::rename(&temp_file, &path) {
            let _ = fs::remove_file(&temp_file);
            return Err(PresetError::io(&path, e));
        }

        tracing::info!(preset = name, path = %path.display(), "saved preset");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<ConversionConfig, PresetError> {
        let path = self.path_for(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PresetError::NotFound(name.to_string()));
            }
            Err(e) => return Err(PresetError::io(&path, e)),
        };

        let config =
            from_text(&content).map_err(|source| PresetError::Deserialization {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(preset = name, path = %path.display(), "loaded preset");
        Ok(config)
    }

    pub fn delete(&self, name: &str) -> Result<(), PresetError> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(preset = name, path = %path.display(), "deleted preset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PresetError::NotFound(name.to_string()))
            }
            Err(e) => Err(PresetError::io(&path, e)),
        }
    }

    /// Sorted names of the stored presets; a missing directory means none
    pub fn list(&self) -> Result<Vec<String>, PresetError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PresetError::io(&self.dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %self.dir.display(), error = %e, "skipping unreadable preset entry");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(PRESET_EXTENSION)
            {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => names.push(stem.to_string()),
                None => {
                    tracing::warn!(path = %path.display(), "skipping preset with a non UTF-8 name");
                }
            }
        }

        names.sort();
        Ok(names)
    }
}
