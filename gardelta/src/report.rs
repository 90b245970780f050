//! Report rendering.
//!
//! Groups the collected records by resolved level and renders one
//! fixed-width two-column table per group. Group order is the first-
//! encounter order of each level in the input collection - observable
//! output, not an implementation detail. Rows within a group sort by
//! object name.

use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDate;

use crate::registry::AddressObject;

/// Minimum width of the type-designator column, in characters.
const TYPE_COLUMN_WIDTH: usize = 35;

/// Minimum width of the object-name column, in characters.
const NAME_COLUMN_WIDTH: usize = 23;

const TABLE_HEADER: &str = "| Краткое наименование типа объекта | Наименование объекта |";
const TABLE_SEPARATOR: &str = "|-----------------------------------|-----------------------|";

/// Render the full report document.
pub fn render_report(objects: &[AddressObject], date: NaiveDate) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("Дата изменений: {}\n", date.format("%d.%m.%Y")));
    out.push('\n');

    for (level, group) in group_by_level(objects) {
        out.push_str(&format!("Уровень: {}\n", level));
        out.push_str(TABLE_HEADER);
        out.push('\n');
        out.push_str(TABLE_SEPARATOR);
        out.push('\n');

        let mut rows = group;
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        for obj in rows {
            out.push_str(&format!(
                "| {} | {} |\n",
                pad(&obj.short_name, TYPE_COLUMN_WIDTH),
                pad(&obj.name, NAME_COLUMN_WIDTH)
            ));
        }

        out.push('\n');
    }

    out
}

/// Render the report and write it to `path`, replacing prior content.
///
/// The document is rendered in full before the single write, so a partial
/// report never reaches the disk.
pub fn write_report(path: &Path, objects: &[AddressObject], date: NaiveDate) -> io::Result<()> {
    fs::write(path, render_report(objects, date))
}

/// Group records by level in first-encounter order.
fn group_by_level(objects: &[AddressObject]) -> Vec<(&str, Vec<&AddressObject>)> {
    let mut groups: Vec<(&str, Vec<&AddressObject>)> = Vec::new();

    for obj in objects {
        match groups.iter_mut().find(|(level, _)| *level == obj.level) {
            Some((_, members)) => members.push(obj),
            None => groups.push((obj.level.as_str(), vec![obj])),
        }
    }

    groups
}

/// Right-pad a value with spaces to a minimum character width.
///
/// Counts characters, not bytes, so Cyrillic values align. Values wider
/// than the column are left untruncated.
fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let mut padded = String::with_capacity(value.len() + width.saturating_sub(len));
    padded.push_str(value);
    for _ in len..width {
        padded.push(' ');
    }
    padded
}
