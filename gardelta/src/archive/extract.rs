//! Zip extraction for the downloaded delta archive.
//!
//! Extraction is a directory replacement: any previous extraction is removed
//! wholesale before the archive is unpacked, so the tree always reflects
//! exactly one delta.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use zip::ZipArchive;

use super::error::{ArchiveError, ArchiveResult};
use super::traits::ArchiveExtractor;

/// Zip-based archive extractor.
#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a new zip extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract `archive` into `dest_dir`, replacing previous contents.
    fn extract_zip(&self, archive: &Path, dest_dir: &Path) -> ArchiveResult<usize> {
        if dest_dir.exists() {
            fs::remove_dir_all(dest_dir).map_err(|e| ArchiveError::WriteFailed {
                path: dest_dir.to_path_buf(),
                source: e,
            })?;
        }

        fs::create_dir_all(dest_dir).map_err(|e| ArchiveError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let file = File::open(archive).map_err(|e| ArchiveError::ReadFailed {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let mut zip =
            ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            })?;

        zip.extract(dest_dir)
            .map_err(|e| ArchiveError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            })?;

        count_files_recursive(dest_dir)
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> ArchiveResult<usize> {
        self.extract_zip(archive_path, dest_dir)
    }
}

/// Count files recursively in a directory.
fn count_files_recursive(dir: &Path) -> ArchiveResult<usize> {
    let mut count = 0;

    if !dir.exists() {
        return Ok(0);
    }

    let entries = fs::read_dir(dir).map_err(|e| ArchiveError::ReadFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            count += 1;
        } else if path.is_dir() {
            count += count_files_recursive(&path)?;
        }
    }

    Ok(count)
}
