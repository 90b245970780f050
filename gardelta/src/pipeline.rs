//! Aggregation pipeline.
//!
//! Orchestrates discovery, level loading, per-file extraction, and report
//! generation. Each data file is folded into the run as a pair of
//! (records, optional date candidate); a bad file contributes nothing and
//! never aborts the run.

use std::io;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::registry::{extract_file, AddressObject, LevelIndex, RegistryDiscovery};
use crate::report;

/// Errors that can abort a pipeline run.
///
/// Per-file extraction failures are not represented here: they are
/// diagnosed and counted as skips.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Failed to scan the extraction directory.
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the report file.
    #[error("failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// No data files were found; no report was written.
    NoDataFiles,

    /// Data files were processed but held no active records; no report was
    /// written.
    NoActiveObjects,

    /// The report was generated.
    ReportWritten {
        /// Where the report landed.
        path: PathBuf,
        /// Number of active records in the report.
        object_count: usize,
        /// Data files successfully processed.
        files_processed: usize,
        /// Data files skipped due to parse or read failures.
        files_skipped: usize,
    },
}

/// Run the full extraction/aggregation/report pipeline over an extracted
/// archive tree.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutcome, PipelineError> {
    let discovery = RegistryDiscovery::new(&config.extract_dir);
    let files = discovery.find_files().map_err(|e| PipelineError::Scan {
        path: config.extract_dir.clone(),
        source: e,
    })?;

    if files.data_files.is_empty() {
        info!(
            "no AS_ADDR_OBJ data files found under {}",
            config.extract_dir.display()
        );
        return Ok(PipelineOutcome::NoDataFiles);
    }

    let levels = match &files.levels_file {
        Some(path) => {
            let index = LevelIndex::load(path);
            debug!("loaded {} object levels from {}", index.len(), path.display());
            index
        }
        None => {
            warn!("object levels file not found, all levels will be unresolved");
            LevelIndex::empty()
        }
    };

    let mut objects: Vec<AddressObject> = Vec::new();
    let mut latest: Option<NaiveDate> = None;
    let mut skipped = 0usize;

    for path in &files.data_files {
        match extract_file(path, &levels) {
            Ok(extract) => {
                debug!(
                    "{}: {} active objects",
                    path.display(),
                    extract.objects.len()
                );
                latest = keep_later(latest, extract.update_date);
                objects.extend(extract.objects);
            }
            Err(e) => {
                warn!("skipping data file: {}", e);
                skipped += 1;
            }
        }
    }

    if objects.is_empty() {
        info!("no active address objects found");
        return Ok(PipelineOutcome::NoActiveObjects);
    }

    let date = latest.unwrap_or_else(|| Local::now().date_naive());
    let object_count = objects.len();

    report::write_report(&config.report_path, &objects, date).map_err(|e| {
        PipelineError::ReportWrite {
            path: config.report_path.clone(),
            source: e,
        }
    })?;
    info!("report written to {}", config.report_path.display());

    Ok(PipelineOutcome::ReportWritten {
        path: config.report_path.clone(),
        object_count,
        files_processed: files.data_files.len() - skipped,
        files_skipped: skipped,
    })
}

/// Monotonic date combinator: keep the strictly later of the two.
///
/// Ties keep the current value, so the first-seen date wins on equality.
fn keep_later(current: Option<NaiveDate>, candidate: Option<NaiveDate>) -> Option<NaiveDate> {
    match (current, candidate) {
        (Some(cur), Some(new)) if new > cur => Some(new),
        (None, candidate) => candidate,
        (current, _) => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_keep_later_prefers_strictly_newer() {
        let result = keep_later(Some(date(2024, 1, 1)), Some(date(2024, 3, 15)));
        assert_eq!(result, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_keep_later_ignores_older() {
        let result = keep_later(Some(date(2024, 3, 15)), Some(date(2024, 2, 1)));
        assert_eq!(result, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_keep_later_tie_keeps_first_seen() {
        let result = keep_later(Some(date(2024, 3, 15)), Some(date(2024, 3, 15)));
        assert_eq!(result, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_keep_later_none_current_takes_candidate() {
        assert_eq!(keep_later(None, Some(date(2024, 1, 1))), Some(date(2024, 1, 1)));
        assert_eq!(keep_later(None, None), None);
    }

    #[test]
    fn test_keep_later_none_candidate_keeps_current() {
        assert_eq!(keep_later(Some(date(2024, 1, 1)), None), Some(date(2024, 1, 1)));
    }
}
