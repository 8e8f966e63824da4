// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Closed, string-valued option sets used by the conversion config

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a member of an option set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}', expected one of: {}", expected.join(", "))]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Every member, in declaration order
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// String values accepted on the wire, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: Self::VALUES,
                    }),
                }
            }
        }
    };
}

/// How tables found in the source document are carried into the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum TableMode {
    /// Structured when detection is confident, image otherwise
    #[default]
    Auto,
    /// Always emit HTML tables
    Structured,
    /// Always rasterize tables
    ImageOnly,
}

string_enum!(TableMode, "table mode", {
    Auto => "auto",
    Structured => "structured",
    ImageOnly => "image-only",
});

/// OCR behaviour for pages without a usable text layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OcrMode {
    #[default]
    Auto,
    On,
    Off,
}

string_enum!(OcrMode, "OCR mode", {
    Auto => "auto",
    On => "on",
    Off => "off",
});

/// Backend log detail, passed as repeated `-v` flags
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum VerbosityLevel {
    #[default]
    Normal,
    Verbose,
    Debug,
}

string_enum!(VerbosityLevel, "verbosity level", {
    Normal => "normal",
    Verbose => "verbose",
    Debug => "debug",
});

impl VerbosityLevel {
    /// Number of `-v` flags the backend expects for this level
    pub fn flag_count(self) -> usize {
        match self {
            VerbosityLevel::Normal => 0,
            VerbosityLevel::Verbose => 1,
            VerbosityLevel::Debug => 2,
        }
    }
}
