// src/dpkg.rs

//! Installed-package database port
//!
//! The facade reads installed metadata and file ownership through the
//! [`PackageDatabase`] trait. [`Dpkg`] implements it on top of `dpkg-query`
//! and `dpkg -L`, going through the same [`CommandRunner`] as everything else.

use crate::config::AptConfig;
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::parsers::PackageRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Files owned by each package, plus per-package lookup errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileDict {
    pub errors: BTreeMap<String, String>,
    pub packages: BTreeMap<String, Vec<String>>,
}

/// Files owned by a set of packages as one flat list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileList {
    pub errors: BTreeMap<String, String>,
    pub files: Vec<String>,
}

impl From<FileDict> for FileList {
    fn from(dict: FileDict) -> Self {
        Self {
            errors: dict.errors,
            files: dict.packages.into_values().flatten().collect(),
        }
    }
}

/// Read access to the installed-package database
pub trait PackageDatabase {
    /// Installed version of `name`, `None` when it is not installed
    fn version(&self, name: &str) -> Result<Option<String>>;

    /// Raw metadata of the named packages (all installed packages when empty)
    fn info(&self, names: &[&str]) -> Result<BTreeMap<String, PackageRecord>>;

    /// Files of the named packages, grouped by package
    fn file_dict(&self, names: &[&str]) -> Result<FileDict>;

    /// Files of the named packages as one list
    fn file_list(&self, names: &[&str]) -> Result<FileList> {
        Ok(self.file_dict(names)?.into())
    }
}

/// Metadata fields requested from dpkg-query, in output order
const INFO_FIELDS: &[(&str, &str)] = &[
    ("name", "${Package}"),
    ("version", "${Version}"),
    ("architecture", "${Architecture}"),
    ("section", "${Section}"),
    ("maintainer", "${Maintainer}"),
    ("homepage", "${Homepage}"),
    ("source", "${source:Package}"),
    ("description", "${binary:Summary}"),
];

/// dpkg-backed package database
pub struct Dpkg<R: CommandRunner> {
    runner: R,
    config: AptConfig,
}

impl<R: CommandRunner> Dpkg<R> {
    pub fn new(runner: R, config: AptConfig) -> Self {
        Self { runner, config }
    }

    fn dpkg_query(&self, format: &str, names: &[&str]) -> Vec<String> {
        let mut argv = vec![
            self.config.dpkg_query.clone(),
            "-W".to_string(),
            "-f".to_string(),
            format.to_string(),
        ];
        argv.extend(names.iter().map(|n| n.to_string()));
        argv
    }

    /// Names of every package dpkg considers installed
    fn installed_names(&self) -> Result<Vec<String>> {
        let argv = self.dpkg_query("${db:Status-Abbrev}\t${Package}\n", &[]);
        let output = self.runner.run_all(&argv, None)?;

        let names: Vec<String> = output
            .stdout
            .lines()
            .filter_map(|line| line.split_once('\t'))
            .filter(|(status, _)| is_installed(status))
            .map(|(_, name)| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        debug!("Found {} installed packages", names.len());
        Ok(names)
    }

    /// Install time, taken from the mtime of the package's `.list` file
    fn install_date(&self, name: &str, arch: &str) -> Option<String> {
        let candidates: [PathBuf; 2] = [
            self.config.dpkg_info_dir.join(format!("{}.list", name)),
            self.config.dpkg_info_dir.join(format!("{}:{}.list", name, arch)),
        ];
        candidates.iter().find_map(|path| {
            let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
            let date: DateTime<Utc> = modified.into();
            Some(date.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        })
    }
}

impl<R: CommandRunner> PackageDatabase for Dpkg<R> {
    fn version(&self, name: &str) -> Result<Option<String>> {
        let argv = self.dpkg_query("${db:Status-Abbrev}\t${Version}\n", &[name]);
        let output = self.runner.run_all(&argv, None)?;
        if !output.success() {
            debug!("dpkg-query does not know {}", name);
            return Ok(None);
        }

        Ok(output
            .stdout
            .lines()
            .filter_map(|line| line.split_once('\t'))
            .find(|(status, _)| is_installed(status))
            .map(|(_, version)| version.trim().to_string())
            .filter(|version| !version.is_empty()))
    }

    fn info(&self, names: &[&str]) -> Result<BTreeMap<String, PackageRecord>> {
        let format = std::iter::once("${db:Status-Abbrev}")
            .chain(INFO_FIELDS.iter().map(|(_, field)| *field))
            .collect::<Vec<_>>()
            .join("\t")
            + "\n";
        let argv = self.dpkg_query(&format, names);
        let output = self.runner.run_all(&argv, None)?;
        if !output.success() {
            // Unknown names are reported on stderr; known ones are still listed
            warn!("dpkg-query: {}", output.stderr.trim());
        }

        let mut packages = BTreeMap::new();
        for line in output.stdout.lines() {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != INFO_FIELDS.len() + 1 {
                warn!("Skipping malformed dpkg-query output line: {}", line);
                continue;
            }
            if !is_installed(fields[0]) {
                continue;
            }

            let mut record: PackageRecord = INFO_FIELDS
                .iter()
                .zip(&fields[1..])
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|((key, _), value)| (key.to_string(), value.trim().to_string()))
                .collect();

            let Some(name) = record.get("name").cloned() else {
                continue;
            };
            let arch = record.get("architecture").cloned().unwrap_or_default();
            if let Some(date) = self.install_date(&name, &arch) {
                record.insert("install_date".to_string(), date);
            }
            packages.insert(name, record);
        }

        debug!("Queried metadata for {} packages", packages.len());
        Ok(packages)
    }

    fn file_dict(&self, names: &[&str]) -> Result<FileDict> {
        let names: Vec<String> = if names.is_empty() {
            self.installed_names()?
        } else {
            names.iter().map(|n| n.to_string()).collect()
        };

        let mut dict = FileDict::default();
        for name in names {
            let argv = vec![self.config.dpkg.clone(), "-L".to_string(), name.clone()];
            let output = self.runner.run_all(&argv, None)?;
            if !output.success() {
                let message = output.stderr.trim();
                let message = if message.is_empty() {
                    format!("Package '{}' is not installed", name)
                } else {
                    message.to_string()
                };
                dict.errors.insert(name, message);
                continue;
            }

            // Diversion notes and "does not contain any files" are not paths
            let files: Vec<String> = output
                .stdout
                .lines()
                .map(str::trim)
                .filter(|path| path.starts_with('/'))
                .map(str::to_string)
                .collect();
            debug!("Found {} files for package {}", files.len(), name);
            dict.packages.insert(name, files);
        }

        Ok(dict)
    }
}

/// `${db:Status-Abbrev}` is want/status/error flags; `?i` means installed
fn is_installed(abbrev: &str) -> bool {
    abbrev.chars().nth(1) == Some('i')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_installed() {
        assert!(is_installed("ii "));
        assert!(is_installed("hi "));
        assert!(!is_installed("rc "));
        assert!(!is_installed("un "));
        assert!(!is_installed(""));
    }

    #[test]
    fn test_file_list_from_dict() {
        let mut dict = FileDict::default();
        dict.packages.insert("a".to_string(), vec!["/a/1".to_string(), "/a/2".to_string()]);
        dict.packages.insert("b".to_string(), vec!["/b/1".to_string()]);
        dict.errors.insert("c".to_string(), "not installed".to_string());

        let list = FileList::from(dict);
        assert_eq!(list.files, vec!["/a/1", "/a/2", "/b/1"]);
        assert_eq!(list.errors["c"], "not installed");
    }
}
