// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Filesystem metadata checks used by the validator

use std::path::Path;

/// Metadata-only view of the filesystem.
///
/// Implementations must answer from `stat`-style calls: no content reads and
/// no directory creation.
pub trait FsProbe {
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Whether the current user may create or modify entries at `path`
    fn is_writable(&self, path: &Path) -> bool;
}

/// Probe backed by the host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl FsProbe for HostFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[cfg(unix)]
    fn is_writable(&self, path: &Path) -> bool {
        use nix::unistd::{access, AccessFlags};
        access(path, AccessFlags::W_OK).is_ok()
    }

    #[cfg(not(unix))]
    fn is_writable(&self, path: &Path) -> bool {
        std::fs::metadata(path).map(|m| !m.permissions().readonly()).unwrap_or(false)
    }
}
