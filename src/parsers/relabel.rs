// src/parsers/relabel.rs

//! Declarative field renaming for package metadata records

use std::collections::BTreeMap;

/// Raw package metadata, field name -> value
pub type PackageRecord = BTreeMap<String, String>;

/// Renames applied by `info_installed` (raw dpkg name -> presented name)
pub const INFO_RENAMES: &[(&str, &str)] = &[
    ("section", "group"),
    ("maintainer", "packager"),
    ("homepage", "url"),
];

/// Rename every field of `table` that is present with a non-empty value.
/// Missing or empty fields keep their original name; nothing is invented.
pub fn relabel(mut record: PackageRecord, table: &[(&str, &str)]) -> PackageRecord {
    for (old, new) in table {
        let present = record.get(*old).is_some_and(|value| !value.is_empty());
        if present {
            if let Some(value) = record.remove(*old) {
                record.insert(new.to_string(), value);
            }
        }
    }
    record
}

/// The table that undoes `table`
pub fn invert<'a>(table: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    table.iter().map(|(old, new)| (*new, *old)).collect()
}
