//! Trait seams for the archive collaborators.
//!
//! The pipeline itself only consumes an extracted directory tree, so these
//! traits exist to let the CLI (and tests) swap the network and unpacking
//! implementations independently.

use std::path::Path;

use super::error::ArchiveResult;

/// Downloads the registry archive to a local file.
pub trait ArchiveFetcher {
    /// Fetch `url` into `dest`, returning the number of bytes written.
    fn fetch(&self, url: &str, dest: &Path) -> ArchiveResult<u64>;
}

/// Unpacks a downloaded archive into a destination directory.
pub trait ArchiveExtractor {
    /// Extract `archive_path` into `dest_dir`, replacing any previous
    /// contents. Returns the number of files extracted.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> ArchiveResult<usize>;
}
