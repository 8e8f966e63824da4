// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Convert-readiness checks.
//!
//! Checks never mutate the config and never fail: every problem becomes a
//! [`Violation`]. Results are ordered by section (core, conversion,
//! performance, caching) and by field declaration order within a section.
//! Caching is only checked for a path the text form can carry; the module,
//! output and logging sections carry nothing beyond their types.

use crate::error::InvalidConfig;
use crate::fs_probe::{FsProbe, HostFs};
use crate::pages::{check_page_selection, matches_page_pattern};
use p2f_config_types::{
    CachingSection, ConversionConfig, ConversionSection, CoreSection, PerformanceSection,
};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

/// Slug shape required of module identifiers
pub const MODULE_ID_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";

/// Extension the source document must carry
pub const SOURCE_EXTENSION: &str = "pdf";

/// Upper bound offered to users for the worker count
pub const MAX_WORKERS_HINT: usize = 32;

/// One problem that keeps a config from being convert-ready
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `core.mod_id`
    pub field: &'static str,
    /// Stable machine-readable code
    pub code: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        let violation = Self {
            field,
            code,
            message: message.into(),
        };
        tracing::debug!(field, code, reason = %violation.message, "config check failed");
        violation
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Whether `mod_id` is a valid slug
pub fn is_valid_module_id(mod_id: &str) -> bool {
    static MOD_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    MOD_ID_REGEX
        .get_or_init(|| Regex::new(MODULE_ID_PATTERN).expect("valid module id pattern"))
        .is_match(mod_id)
}

/// Violation for a path the JSON text form and the backend argv cannot carry
fn non_utf8_path(field: &'static str, path: &Path) -> Option<Violation> {
    if path.to_str().is_some() {
        return None;
    }
    Some(Violation::new(
        field,
        "non_utf8_path",
        format!("Path is not valid UTF-8: {}", path.display()),
    ))
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// Checks for the core section: source file, module id, title, output directory
pub fn validate_core(core: &CoreSection, fs: &impl FsProbe) -> Vec<Violation> {
    let mut violations = Vec::new();
    let missing = core.missing_required();

    let pdf = core.pdf.as_path();
    if missing.contains(&"pdf") {
        violations.push(Violation::new(
            "core.pdf",
            "required",
            "PDF file path is required",
        ));
    } else if let Some(violation) = non_utf8_path("core.pdf", pdf) {
        violations.push(violation);
    } else if !has_source_extension(pdf) {
        violations.push(Violation::new(
            "core.pdf",
            "invalid_extension",
            format!("Source file must be a .pdf document: {}", pdf.display()),
        ));
    } else if !fs.exists(pdf) {
        violations.push(Violation::new(
            "core.pdf",
            "file_not_found",
            format!("PDF file does not exist: {}", pdf.display()),
        ));
    } else if !fs.is_file(pdf) {
        violations.push(Violation::new(
            "core.pdf",
            "not_a_file",
            format!("Path is not a file: {}", pdf.display()),
        ));
    }

    if missing.contains(&"mod_id") {
        violations.push(Violation::new(
            "core.mod_id",
            "required",
            "Module ID is required",
        ));
    } else if !is_valid_module_id(&core.mod_id) {
        violations.push(Violation::new(
            "core.mod_id",
            "invalid_format",
            format!(
                "Module ID must be lowercase letters and digits separated by single hyphens (e.g. 'my-module'), got '{}'",
                core.mod_id
            ),
        ));
    }

    if missing.contains(&"mod_title") {
        violations.push(Violation::new(
            "core.mod_title",
            "required",
            "Module title is required",
        ));
    }

    violations.extend(check_out_dir(&core.out_dir, fs));
    violations
}

fn check_out_dir(out_dir: &Path, fs: &impl FsProbe) -> Option<Violation> {
    if out_dir.as_os_str().is_empty() {
        return Some(Violation::new(
            "core.out_dir",
            "required",
            "Output directory is required",
        ));
    }
    if let Some(violation) = non_utf8_path("core.out_dir", out_dir) {
        return Some(violation);
    }

    let parent = out_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    if !fs.exists(parent) {
        return Some(Violation::new(
            "core.out_dir",
            "parent_missing",
            format!("Parent directory of the output directory does not exist: {}", parent.display()),
        ));
    }
    if !fs.is_writable(parent) {
        return Some(Violation::new(
            "core.out_dir",
            "not_writable",
            format!("Parent directory of the output directory is not writable: {}", parent.display()),
        ));
    }
    if fs.exists(out_dir) {
        if !fs.is_dir(out_dir) {
            return Some(Violation::new(
                "core.out_dir",
                "not_a_directory",
                format!("Output path exists and is not a directory: {}", out_dir.display()),
            ));
        }
        if !fs.is_writable(out_dir) {
            return Some(Violation::new(
                "core.out_dir",
                "not_writable",
                format!("Output directory is not writable: {}", out_dir.display()),
            ));
        }
    }
    None
}

/// Cross-field check: picture descriptions need a vision model
pub fn validate_conversion(conversion: &ConversionSection) -> Vec<Violation> {
    let mut violations = Vec::new();
    if conversion.picture_descriptions && conversion.vlm_repo_id.trim().is_empty() {
        violations.push(Violation::new(
            "conversion.vlm_repo_id",
            "required_with_picture_descriptions",
            "VLM repository ID is required when picture descriptions are enabled",
        ));
    }
    violations
}

pub fn validate_performance(performance: &PerformanceSection) -> Vec<Violation> {
    let mut violations = Vec::new();

    let pages = performance.pages.as_str();
    if !pages.is_empty() {
        if !matches_page_pattern(pages) {
            violations.push(Violation::new(
                "performance.pages",
                "invalid_format",
                format!(
                    "Invalid page selection '{pages}', use comma-separated pages and ranges such as 1,3,5-10"
                ),
            ));
        } else if let Err(err) = check_page_selection(pages) {
            violations.push(Violation::new(
                "performance.pages",
                "invalid_page",
                err.to_string(),
            ));
        }
    }

    if performance.workers < 1 {
        violations.push(Violation::new(
            "performance.workers",
            "out_of_range",
            format!("Number of workers must be at least 1, got {}", performance.workers),
        ));
    }

    violations
}

/// The cache path must be representable in the text form and the argv
pub fn validate_caching(caching: &CachingSection) -> Vec<Violation> {
    caching
        .cache_path()
        .and_then(|path| non_utf8_path("caching.docling_json", path))
        .into_iter()
        .collect()
}

/// All violations for `config`, checking paths against the host filesystem
pub fn validate_config(config: &ConversionConfig) -> Vec<Violation> {
    validate_config_with(config, &HostFs)
}

/// All violations for `config`: core, conversion, performance, then caching
pub fn validate_config_with(config: &ConversionConfig, fs: &impl FsProbe) -> Vec<Violation> {
    let mut violations = validate_core(&config.core, fs);
    violations.extend(validate_conversion(&config.conversion));
    violations.extend(validate_performance(&config.performance));
    violations.extend(validate_caching(&config.caching));
    tracing::debug!(count = violations.len(), "validated conversion config");
    violations
}

/// Largest worker count worth offering: logical cores, capped at 32.
///
/// Presentation hint only; the validator enforces the lower bound alone.
pub fn worker_limit_hint() -> i32 {
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    cores.min(MAX_WORKERS_HINT) as i32
}

/// Outcome of validating one config, for actions that must refuse invalid input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn for_config(config: &ConversionConfig) -> Self {
        Self::for_config_with(config, &HostFs)
    }

    pub fn for_config_with(config: &ConversionConfig, fs: &impl FsProbe) -> Self {
        Self {
            violations: validate_config_with(config, fs),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable messages, in report order
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Fail with every violation at once when the config is not convert-ready
    pub fn into_result(self) -> Result<(), InvalidConfig> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(InvalidConfig {
                violations: self.violations,
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    /// In-memory probe so checks can be exercised without touching disk
    #[derive(Default)]
    pub(crate) struct MemFs {
        pub files: HashSet<PathBuf>,
        pub dirs: HashSet<PathBuf>,
        pub read_only: HashSet<PathBuf>,
    }

    impl MemFs {
        pub(crate) fn with_book() -> Self {
            let mut fs = MemFs::default();
            fs.files.insert(PathBuf::from("/books/book.pdf"));
            fs.dirs.insert(PathBuf::from("/books"));
            fs.dirs.insert(PathBuf::from("/out"));
            fs.dirs.insert(PathBuf::from("."));
            fs
        }
    }

    impl FsProbe for MemFs {
        fn exists(&self, path: &Path) -> bool {
            self.files.contains(path) || self.dirs.contains(path)
        }
        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(path)
        }
        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains(path)
        }
        fn is_writable(&self, path: &Path) -> bool {
            self.exists(path) && !self.read_only.contains(path)
        }
    }

    pub(crate) fn ready_config() -> ConversionConfig {
        let mut config = ConversionConfig::new();
        config.core.pdf = PathBuf::from("/books/book.pdf");
        config.core.mod_id = "my-book".into();
        config.core.mod_title = "My Book".into();
        config.core.out_dir = PathBuf::from("/out/modules");
        config
    }

    fn fields(violations: &[Violation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.field).collect()
    }

    #[test]
    fn test_ready_config_has_no_violations() {
        let fs = MemFs::with_book();
        assert!(validate_config_with(&ready_config(), &fs).is_empty());
    }

    #[test]
    fn test_default_config_reports_required_core_fields_in_order() {
        let fs = MemFs::with_book();
        let violations = validate_config_with(&ConversionConfig::default(), &fs);
        assert_eq!(fields(&violations), vec!["core.pdf", "core.mod_id", "core.mod_title"]);
        assert!(violations.iter().all(|v| v.code == "required"));
    }

    #[test]
    fn test_source_file_checks() {
        let mut fs = MemFs::with_book();
        fs.dirs.insert(PathBuf::from("/books/folder.pdf"));
        let mut core = ready_config().core;

        core.pdf = PathBuf::from("/books/book.epub");
        assert_eq!(validate_core(&core, &fs)[0].code, "invalid_extension");

        core.pdf = PathBuf::from("/books/missing.pdf");
        assert_eq!(validate_core(&core, &fs)[0].code, "file_not_found");

        core.pdf = PathBuf::from("/books/folder.pdf");
        assert_eq!(validate_core(&core, &fs)[0].code, "not_a_file");

        fs.files.insert(PathBuf::from("/books/UPPER.PDF"));
        core.pdf = PathBuf::from("/books/UPPER.PDF");
        assert!(validate_core(&core, &fs).is_empty());
    }

    #[test]
    fn test_module_id_slug_examples() {
        assert!(!is_valid_module_id("My Book"));
        assert!(is_valid_module_id("my-book-2"));
        assert!(!is_valid_module_id("my--book"));
        assert!(!is_valid_module_id("-my-book"));
        assert!(!is_valid_module_id("my_book"));

        let fs = MemFs::with_book();
        let mut core = ready_config().core;
        core.mod_id = "My Book".into();
        let violations = validate_core(&core, &fs);
        assert_eq!(fields(&violations), vec!["core.mod_id"]);
        assert_eq!(violations[0].code, "invalid_format");
    }

    #[test]
    fn test_blank_title_is_required() {
        let fs = MemFs::with_book();
        let mut core = ready_config().core;
        core.mod_title = " \t".into();
        assert_eq!(fields(&validate_core(&core, &fs)), vec!["core.mod_title"]);
    }

    #[test]
    fn test_out_dir_checks() {
        let mut fs = MemFs::with_book();
        let mut core = ready_config().core;

        core.out_dir = PathBuf::from("/nowhere/modules");
        assert_eq!(validate_core(&core, &fs)[0].code, "parent_missing");

        fs.read_only.insert(PathBuf::from("/out"));
        core.out_dir = PathBuf::from("/out/modules");
        assert_eq!(validate_core(&core, &fs)[0].code, "not_writable");

        fs.read_only.clear();
        fs.files.insert(PathBuf::from("/out/modules"));
        assert_eq!(validate_core(&core, &fs)[0].code, "not_a_directory");

        // Bare relative names resolve against the working directory
        core.out_dir = PathBuf::from("dist");
        assert!(validate_core(&core, &fs).is_empty());

        core.out_dir = PathBuf::new();
        assert_eq!(validate_core(&core, &fs)[0].code, "required");
    }

    #[test]
    fn test_picture_descriptions_need_vlm_repo() {
        let fs = MemFs::with_book();
        let mut config = ready_config();
        config.conversion.picture_descriptions = true;
        config.conversion.vlm_repo_id = "   ".into();

        let violations = validate_config_with(&config, &fs);
        assert_eq!(fields(&violations), vec!["conversion.vlm_repo_id"]);

        config.conversion.picture_descriptions = false;
        assert!(validate_config_with(&config, &fs).is_empty());

        config.conversion.picture_descriptions = true;
        config.conversion.vlm_repo_id = "HuggingFaceTB/SmolVLM-256M-Instruct".into();
        assert!(validate_config_with(&config, &fs).is_empty());
    }

    #[test]
    fn test_page_selection_examples() {
        let mut performance = PerformanceSection::default();
        assert!(validate_performance(&performance).is_empty());

        performance.pages = "1,5-10,15".into();
        assert!(validate_performance(&performance).is_empty());

        performance.pages = "1,,5".into();
        let violations = validate_performance(&performance);
        assert_eq!(violations[0].code, "invalid_format");

        performance.pages = "10-5".into();
        assert_eq!(validate_performance(&performance)[0].code, "invalid_page");

        performance.pages = "0".into();
        assert_eq!(validate_performance(&performance)[0].code, "invalid_page");
    }

    #[test]
    fn test_huge_page_span_is_checked_without_expansion() {
        let mut performance = PerformanceSection::default();
        performance.pages = "1-4294967295".into();

        let started = std::time::Instant::now();
        assert!(validate_performance(&performance).is_empty());
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        performance.pages = "4294967295-1".into();
        assert_eq!(validate_performance(&performance)[0].code, "invalid_page");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_are_violations() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let fs = MemFs::with_book();
        let mut config = ready_config();
        config.core.pdf = OsStr::from_bytes(b"/books/b\xffk.pdf").into();
        config.core.out_dir = OsStr::from_bytes(b"/out/\xfe").into();
        config.caching.docling_json = Some(OsStr::from_bytes(b"/cache/\xff.json").into());

        let violations = validate_config_with(&config, &fs);
        assert_eq!(
            fields(&violations),
            vec!["core.pdf", "core.out_dir", "caching.docling_json"]
        );
        assert!(violations.iter().all(|v| v.code == "non_utf8_path"));
        assert!(crate::serialize::to_text(&config).is_err());
    }

    #[test]
    fn test_required_fields_follow_missing_required() {
        let fs = MemFs::with_book();
        let mut core = ready_config().core;
        core.pdf = PathBuf::new();
        core.mod_id.clear();
        core.mod_title = "  ".into();

        let required: Vec<_> = validate_core(&core, &fs)
            .into_iter()
            .filter(|v| v.code == "required")
            .map(|v| v.field)
            .collect();
        assert_eq!(required, vec!["core.pdf", "core.mod_id", "core.mod_title"]);
        assert_eq!(core.missing_required().len(), required.len());
    }

    #[test]
    fn test_worker_lower_bound_only() {
        let mut performance = PerformanceSection::default();
        for workers in [0, -1, -40] {
            performance.workers = workers;
            let violations = validate_performance(&performance);
            assert_eq!(fields(&violations), vec!["performance.workers"]);
        }
        for workers in [1, 4, 1024] {
            performance.workers = workers;
            assert!(validate_performance(&performance).is_empty());
        }
    }

    #[test]
    fn test_aggregate_is_concatenation_in_section_order() {
        let fs = MemFs::with_book();
        let mut config = ready_config();
        config.core.mod_id = "Bad Id".into();
        config.conversion.picture_descriptions = true;
        config.performance.pages = "x".into();
        config.performance.workers = 0;

        let mut expected = validate_core(&config.core, &fs);
        expected.extend(validate_conversion(&config.conversion));
        expected.extend(validate_performance(&config.performance));
        expected.extend(validate_caching(&config.caching));

        let violations = validate_config_with(&config, &fs);
        assert_eq!(violations, expected);
        assert_eq!(
            fields(&violations),
            vec![
                "core.mod_id",
                "conversion.vlm_repo_id",
                "performance.pages",
                "performance.workers"
            ]
        );
    }

    #[test]
    fn test_report_surfaces_all_messages_together() {
        let fs = MemFs::with_book();
        let report = ValidationReport::for_config_with(&ConversionConfig::default(), &fs);
        assert!(!report.is_ok());
        assert_eq!(report.messages()[0], "core.pdf: PDF file path is required");

        let err = report.into_result().unwrap_err();
        assert_eq!(err.violations.len(), 3);
        let rendered = err.to_string();
        assert!(rendered.contains("core.pdf"));
        assert!(rendered.contains("core.mod_title"));

        let ok = ValidationReport::for_config_with(&ready_config(), &fs);
        assert!(ok.into_result().is_ok());
    }

    #[test]
    fn test_worker_limit_hint_is_bounded() {
        let hint = worker_limit_hint();
        assert!((1..=32).contains(&hint));
    }
}
