//! Error types for registry file processing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a registry XML file.
///
/// These are per-file failures: the pipeline diagnoses them and skips the
/// file, they never abort a run.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to open or read the file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not well-formed XML.
    #[error("malformed XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_path() {
        let err = RegistryError::Io {
            path: PathBuf::from("/data/AS_ADDR_OBJ_1.xml"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("AS_ADDR_OBJ_1.xml"));
        assert!(err.to_string().contains("no such file"));
    }
}
