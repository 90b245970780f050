//! Registry file discovery.
//!
//! Locates the data and lookup files inside an extracted archive tree.
//! Data files (`AS_ADDR_OBJ_*.xml`) can sit at any depth - the archive
//! nests them under per-region directories. The object-levels lookup file
//! (`AS_OBJECT_LEVELS_*.xml`) is only ever meaningful at the top level.

use std::io;
use std::path::{Path, PathBuf};

/// Filename prefix of address-object data files.
const DATA_FILE_PREFIX: &str = "AS_ADDR_OBJ_";

/// Filename prefix of the object-levels lookup file.
const LEVELS_FILE_PREFIX: &str = "AS_OBJECT_LEVELS_";

/// Expected extension for both file kinds.
const XML_EXTENSION: &str = "xml";

/// The set of registry files found in an extracted archive.
#[derive(Debug, Clone, Default)]
pub struct RegistryFiles {
    /// Data files, sorted lexicographically for deterministic processing.
    pub data_files: Vec<PathBuf>,

    /// The lookup file, if one was present at the top level.
    pub levels_file: Option<PathBuf>,
}

/// Discovers registry files under an extraction root.
#[derive(Debug, Clone)]
pub struct RegistryDiscovery {
    root: PathBuf,
}

impl RegistryDiscovery {
    /// Create a new discovery for the given extraction root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the extraction root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the extraction root exists.
    pub fn exists(&self) -> bool {
        self.root.exists() && self.root.is_dir()
    }

    /// Find all registry files under the root.
    ///
    /// A missing root yields an empty file set, not an error. When several
    /// lookup files match, the lexicographically first one wins and the
    /// rest are ignored.
    pub fn find_files(&self) -> io::Result<RegistryFiles> {
        if !self.exists() {
            return Ok(RegistryFiles::default());
        }

        let mut data_files = Vec::new();
        collect_data_files(&self.root, &mut data_files)?;
        data_files.sort();

        Ok(RegistryFiles {
            data_files,
            levels_file: self.find_levels_file()?,
        })
    }

    /// Find the lookup file in the top-level directory only.
    fn find_levels_file(&self) -> io::Result<Option<PathBuf>> {
        let mut candidates = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && matches_pattern(&path, LEVELS_FILE_PREFIX) {
                candidates.push(path);
            }
        }

        candidates.sort();
        Ok(candidates.into_iter().next())
    }
}

/// Recursively collect data files from a directory.
fn collect_data_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_data_files(&path, out)?;
        } else if matches_pattern(&path, DATA_FILE_PREFIX) {
            out.push(path);
        }
    }

    Ok(())
}

/// Check a filename against a registry name pattern: `<prefix>*.xml`.
fn matches_pattern(path: &Path, prefix: &str) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(prefix));

    has_prefix
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(XML_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"<stub/>").unwrap();
    }

    #[test]
    fn test_discovery_nonexistent_root() {
        let discovery = RegistryDiscovery::new("/nonexistent/path");
        assert!(!discovery.exists());

        let files = discovery.find_files().unwrap();
        assert!(files.data_files.is_empty());
        assert!(files.levels_file.is_none());
    }

    #[test]
    fn test_discovery_empty_root() {
        let temp = TempDir::new().unwrap();
        let files = RegistryDiscovery::new(temp.path()).find_files().unwrap();

        assert!(files.data_files.is_empty());
        assert!(files.levels_file.is_none());
    }

    #[test]
    fn test_data_files_found_at_any_depth_and_sorted() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("66/AS_ADDR_OBJ_20240202.xml"));
        touch(&temp.path().join("AS_ADDR_OBJ_20240101.xml"));
        touch(&temp.path().join("77/nested/AS_ADDR_OBJ_20240303.xml"));

        let files = RegistryDiscovery::new(temp.path()).find_files().unwrap();

        assert_eq!(files.data_files.len(), 3);
        let names: Vec<_> = files
            .data_files
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("66/AS_ADDR_OBJ_20240202.xml"),
                PathBuf::from("77/nested/AS_ADDR_OBJ_20240303.xml"),
                PathBuf::from("AS_ADDR_OBJ_20240101.xml"),
            ]
        );
    }

    #[test]
    fn test_levels_file_top_level_only() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("AS_ADDR_OBJ_20240101.xml"));
        touch(&temp.path().join("77/AS_OBJECT_LEVELS_20240101.xml"));

        let files = RegistryDiscovery::new(temp.path()).find_files().unwrap();

        // The nested lookup file must be ignored.
        assert!(files.levels_file.is_none());
    }

    #[test]
    fn test_multiple_levels_files_pick_lexicographically_first() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("AS_OBJECT_LEVELS_20240202.xml"));
        touch(&temp.path().join("AS_OBJECT_LEVELS_20240101.xml"));

        let files = RegistryDiscovery::new(temp.path()).find_files().unwrap();

        let picked = files.levels_file.unwrap();
        assert_eq!(
            picked.file_name().unwrap().to_str().unwrap(),
            "AS_OBJECT_LEVELS_20240101.xml"
        );
    }

    #[test]
    fn test_non_matching_files_ignored() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("AS_HOUSES_20240101.xml"));
        touch(&temp.path().join("AS_ADDR_OBJ_20240101.txt"));
        touch(&temp.path().join("readme.md"));

        let files = RegistryDiscovery::new(temp.path()).find_files().unwrap();

        assert!(files.data_files.is_empty());
        assert!(files.levels_file.is_none());
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("AS_ADDR_OBJ_20240101.XML"));

        let files = RegistryDiscovery::new(temp.path()).find_files().unwrap();
        assert_eq!(files.data_files.len(), 1);
    }
}
