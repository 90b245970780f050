//! Address-object record extraction.
//!
//! Scans one data file and produces the file's active records plus its
//! update-date candidate. Records are resolved eagerly against the level
//! index so downstream stages only ever see display names.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use super::error::RegistryError;
use super::levels::{attr_value, LevelIndex};

/// Element tag of one address-object record.
const OBJECT_TAG: &[u8] = b"OBJECT";

/// Date format of the `UPDATEDATE` attribute.
const UPDATE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One active address object, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressObject {
    /// Proper name of the object. Empty if the record carried no `NAME`.
    pub name: String,

    /// Abbreviated type designator (the `TYPENAME` attribute).
    pub short_name: String,

    /// Resolved level display name, or the unknown-level sentinel.
    pub level: String,
}

/// Everything one data file contributes to a run.
#[derive(Debug, Default)]
pub struct FileExtract {
    /// Active records, in document order.
    pub objects: Vec<AddressObject>,

    /// The file's update-date candidate, taken from the first `OBJECT`
    /// element only. `None` when absent or unparseable.
    pub update_date: Option<NaiveDate>,
}

/// Extract the active address objects from one data file.
///
/// A record is active iff its `ISACTIVE` attribute equals the string `"1"`
/// exactly; `"0"`, `"true"`, empty, and absent values are all excluded.
/// `NAME`/`TYPENAME` default to empty strings, a missing or non-integer
/// `LEVEL` is treated as code 0, and codes absent from the index resolve
/// to the unknown-level sentinel.
pub fn extract_file(path: &Path, levels: &LevelIndex) -> Result<FileExtract, RegistryError> {
    let file = File::open(path).map_err(|e| RegistryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = Reader::from_reader(BufReader::new(file));
    let mut buf = Vec::new();
    let mut extract = FileExtract::default();
    let mut first_object_seen = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == OBJECT_TAG => {
                // Only the first OBJECT element supplies the file's date
                // candidate; the date describes the file, not the record.
                if !first_object_seen {
                    first_object_seen = true;
                    extract.update_date = attr_value(&e, b"UPDATEDATE")
                        .and_then(|v| NaiveDate::parse_from_str(&v, UPDATE_DATE_FORMAT).ok());
                }

                if attr_value(&e, b"ISACTIVE").as_deref() == Some("1") {
                    let code = attr_value(&e, b"LEVEL")
                        .and_then(|v| v.parse::<i64>().ok())
                        .unwrap_or(0);

                    extract.objects.push(AddressObject {
                        name: attr_value(&e, b"NAME").unwrap_or_default(),
                        short_name: attr_value(&e, b"TYPENAME").unwrap_or_default(),
                        level: levels.resolve(code).to_string(),
                    });
                }
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

    Ok(extract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::levels::UNKNOWN_LEVEL;
    use tempfile::TempDir;

    fn write_data(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("AS_ADDR_OBJ_20240101.xml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn city_street_index() -> LevelIndex {
        let mut index = LevelIndex::empty();
        index.insert(5, "Город");
        index.insert(8, "Улица");
        index
    }

    #[test]
    fn test_only_exact_isactive_one_is_extracted() {
        let temp = TempDir::new().unwrap();
        let path = write_data(
            &temp,
            r#"<ADDRESSOBJECTS>
    <OBJECT NAME="Тверь" TYPENAME="г" LEVEL="5" ISACTIVE="1" />
    <OBJECT NAME="Старая Тверь" TYPENAME="г" LEVEL="5" ISACTIVE="0" />
    <OBJECT NAME="Калинин" TYPENAME="г" LEVEL="5" ISACTIVE="true" />
    <OBJECT NAME="Безфлаговая" TYPENAME="ул" LEVEL="8" />
</ADDRESSOBJECTS>"#,
        );

        let extract = extract_file(&path, &city_street_index()).unwrap();

        assert_eq!(extract.objects.len(), 1);
        assert_eq!(extract.objects[0].name, "Тверь");
    }

    #[test]
    fn test_missing_name_and_typename_default_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = write_data(
            &temp,
            r#"<ADDRESSOBJECTS><OBJECT LEVEL="8" ISACTIVE="1"/></ADDRESSOBJECTS>"#,
        );

        let extract = extract_file(&path, &city_street_index()).unwrap();

        assert_eq!(extract.objects.len(), 1);
        assert_eq!(extract.objects[0].name, "");
        assert_eq!(extract.objects[0].short_name, "");
        assert_eq!(extract.objects[0].level, "Улица");
    }

    #[test]
    fn test_unknown_level_code_resolves_to_sentinel() {
        let temp = TempDir::new().unwrap();
        let path = write_data(
            &temp,
            r#"<ADDRESSOBJECTS><OBJECT NAME="Нечто" TYPENAME="х" LEVEL="42" ISACTIVE="1"/></ADDRESSOBJECTS>"#,
        );

        let extract = extract_file(&path, &city_street_index()).unwrap();
        assert_eq!(extract.objects[0].level, UNKNOWN_LEVEL);
    }

    #[test]
    fn test_absent_or_bad_level_treated_as_zero() {
        let temp = TempDir::new().unwrap();
        let path = write_data(
            &temp,
            r#"<ADDRESSOBJECTS>
    <OBJECT NAME="Без уровня" ISACTIVE="1" />
    <OBJECT NAME="Кривой уровень" LEVEL="x9" ISACTIVE="1" />
</ADDRESSOBJECTS>"#,
        );

        let mut index = LevelIndex::empty();
        index.insert(0, "Нулевой уровень");

        let extract = extract_file(&path, &index).unwrap();

        assert_eq!(extract.objects.len(), 2);
        assert_eq!(extract.objects[0].level, "Нулевой уровень");
        assert_eq!(extract.objects[1].level, "Нулевой уровень");
    }

    #[test]
    fn test_update_date_taken_from_first_object_only() {
        let temp = TempDir::new().unwrap();
        // The second element carries a newer date; it must not be consulted.
        let path = write_data(
            &temp,
            r#"<ADDRESSOBJECTS>
    <OBJECT NAME="А" LEVEL="5" ISACTIVE="0" UPDATEDATE="2024-01-01" />
    <OBJECT NAME="Б" LEVEL="5" ISACTIVE="1" UPDATEDATE="2024-06-30" />
</ADDRESSOBJECTS>"#,
        );

        let extract = extract_file(&path, &city_street_index()).unwrap();

        assert_eq!(
            extract.update_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_unparseable_update_date_yields_none() {
        let temp = TempDir::new().unwrap();
        let path = write_data(
            &temp,
            r#"<ADDRESSOBJECTS><OBJECT NAME="А" LEVEL="5" ISACTIVE="1" UPDATEDATE="31.01.2024"/></ADDRESSOBJECTS>"#,
        );

        let extract = extract_file(&path, &city_street_index()).unwrap();
        assert_eq!(extract.update_date, None);
        assert_eq!(extract.objects.len(), 1);
    }

    #[test]
    fn test_missing_update_date_yields_none() {
        let temp = TempDir::new().unwrap();
        let path = write_data(
            &temp,
            r#"<ADDRESSOBJECTS><OBJECT NAME="А" LEVEL="5" ISACTIVE="1"/></ADDRESSOBJECTS>"#,
        );

        let extract = extract_file(&path, &city_street_index()).unwrap();
        assert_eq!(extract.update_date, None);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = write_data(&temp, "<ADDRESSOBJECTS><OBJECT NAME=");

        let result = extract_file(&path, &LevelIndex::empty());
        assert!(matches!(result, Err(RegistryError::Xml { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = extract_file(Path::new("/nonexistent/data.xml"), &LevelIndex::empty());
        assert!(matches!(result, Err(RegistryError::Io { .. })));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let temp = TempDir::new().unwrap();
        let path = write_data(
            &temp,
            r#"<ADDRESSOBJECTS><OBJECT NAME="1-я &quot;Линия&quot;" TYPENAME="ул" LEVEL="8" ISACTIVE="1"/></ADDRESSOBJECTS>"#,
        );

        let extract = extract_file(&path, &city_street_index()).unwrap();
        assert_eq!(extract.objects[0].name, "1-я \"Линия\"");
    }
}
