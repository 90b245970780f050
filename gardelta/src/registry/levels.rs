//! Object-level lookup index.
//!
//! The lookup file maps integer level codes to display names of the
//! administrative hierarchy (region, city, street, ...). The index is built
//! once per run and consulted for every extracted record. Loading never
//! fails: a missing or unreadable lookup file degrades to an empty index
//! and every record resolves to the unknown-level sentinel.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::warn;

use super::error::RegistryError;

/// Display name used when a level code has no entry in the lookup file.
pub const UNKNOWN_LEVEL: &str = "Неизвестный уровень";

/// Element tag of one lookup entry.
const LEVEL_TAG: &[u8] = b"OBJECTLEVEL";

/// Mapping from integer level code to level display name.
#[derive(Debug, Clone, Default)]
pub struct LevelIndex {
    levels: HashMap<i64, String>,
}

impl LevelIndex {
    /// Create an empty index; every code resolves to [`UNKNOWN_LEVEL`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the index from a lookup file.
    ///
    /// Entries missing a `LEVEL` or `NAME` attribute, or with a
    /// non-integer `LEVEL`, are skipped with a diagnostic. Duplicate codes
    /// within the file resolve last-write-wins. Any file-level failure
    /// (I/O, malformed XML) degrades to an empty index.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(index) => index,
            Err(e) => {
                warn!("failed to load object levels: {}", e);
                Self::empty()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, RegistryError> {
        let file = File::open(path).map_err(|e| RegistryError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut reader = Reader::from_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut index = Self::empty();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == LEVEL_TAG => {
                    index.insert_entry(&e, reader.buffer_position());
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(RegistryError::Xml {
                        path: path.to_path_buf(),
                        source: e,
                    })
                }
            }
            buf.clear();
        }

        Ok(index)
    }

    /// Validate one lookup element and insert it into the index.
    fn insert_entry(&mut self, element: &BytesStart<'_>, position: u64) {
        let level = attr_value(element, b"LEVEL");
        let name = attr_value(element, b"NAME");

        let (level, name) = match (level, name) {
            (Some(level), Some(name)) => (level, name),
            _ => {
                warn!(
                    "object level entry near byte {} is missing a LEVEL or NAME attribute",
                    position
                );
                return;
            }
        };

        match level.parse::<i64>() {
            Ok(code) => self.insert(code, name),
            Err(_) => warn!("object level entry has a non-integer LEVEL '{}'", level),
        }
    }

    /// Insert a level name, overwriting any earlier entry for the code.
    pub fn insert(&mut self, code: i64, name: impl Into<String>) {
        self.levels.insert(code, name.into());
    }

    /// Resolve a level code to its display name.
    pub fn resolve(&self, code: i64) -> &str {
        self.levels
            .get(&code)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LEVEL)
    }

    /// Number of known level codes.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Read an attribute value from an element, XML-unescaped.
pub(crate) fn attr_value(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}
