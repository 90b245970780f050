//! Pipeline configuration.
//!
//! This module defines `PipelineConfig`, the full set of paths and the
//! archive URL a run operates on. Defaults match the production registry
//! endpoint; tests inject synthetic directories through the `with_*`
//! builders instead of touching network or fixed disk paths.

use std::path::PathBuf;

/// Production delta archive endpoint.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://fias.nalog.ru/Public/Downloads/Actual/gar_delta_xml.zip";

/// Local filename the archive is downloaded to.
pub const DEFAULT_ARCHIVE_PATH: &str = "gar_delta_xml.zip";

/// Directory the archive is extracted into.
pub const DEFAULT_EXTRACT_DIR: &str = "extracted";

/// Report output filename, overwritten on each run.
pub const DEFAULT_REPORT_PATH: &str = "report.txt";

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// URL the delta archive is fetched from.
    pub archive_url: String,

    /// Local path the archive is saved to.
    pub archive_path: PathBuf,

    /// Directory holding the extracted archive contents.
    pub extract_dir: PathBuf,

    /// Path the rendered report is written to.
    pub report_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            extract_dir: PathBuf::from(DEFAULT_EXTRACT_DIR),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl PipelineConfig {
    /// Create a config with the production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the archive URL.
    pub fn with_archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = url.into();
        self
    }

    /// Set the local archive path.
    pub fn with_archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = path.into();
        self
    }

    /// Set the extraction directory.
    pub fn with_extract_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extract_dir = dir.into();
        self
    }

    /// Set the report output path.
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }
}
