// src/apt/mod.rs

//! The apt facade
//!
//! [`Apt`] turns structured requests into `apt-get`, `apt-cache`, `apt-key`
//! and `dpkg` invocations and parses their output. Collaborators are passed
//! in at construction:
//!
//! - a [`CommandRunner`] for every external command,
//! - a [`PackageDatabase`] for installed metadata and file listings.
//!
//! Argument validation happens before any command runs. State-changing
//! operations report a non-zero exit as `Ok(false)`; data-returning ones
//! report it as [`Error::CommandFailed`].

mod keys;

pub use keys::{fetch_key_file, key_present, AddKeyRequest, KeySource};

use crate::config::AptConfig;
use crate::dpkg::{FileDict, FileList, PackageDatabase};
use crate::error::{Error, Result};
use crate::exec::{CommandOutput, CommandRunner};
use crate::parsers::{
    parse_key_list, parse_owner_line, parse_policy, parse_selections, parse_update_log, relabel,
    KeyRecord, PackageRecord, SelectionsMap, UpdateStatusMap, INFO_RENAMES,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Result of an ownership query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Owner {
    /// Owner of the only path asked about
    Single(String),
    /// Path -> owner, for several paths
    Multiple(BTreeMap<String, String>),
}

/// Package manager facade over apt and dpkg
pub struct Apt<R: CommandRunner, D: PackageDatabase> {
    runner: R,
    db: D,
    config: AptConfig,
}

impl<R: CommandRunner, D: PackageDatabase> Apt<R, D> {
    pub fn new(runner: R, db: D, config: AptConfig) -> Self {
        Self { runner, db, config }
    }

    pub fn config(&self) -> &AptConfig {
        &self.config
    }

    fn argv(tool: &str, args: &[&str]) -> Vec<String> {
        std::iter::once(tool)
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    /// Run a command whose output is required; non-zero exit is an error
    fn run_checked(&self, argv: &[String]) -> Result<CommandOutput> {
        let output = self.runner.run_all(argv, None)?;
        if !output.success() {
            let detail = output.stderr.trim();
            return Err(Error::CommandFailed(format!(
                "{} exited with {}{}{}",
                argv.join(" "),
                output.retcode,
                if detail.is_empty() { "" } else { ": " },
                detail
            )));
        }
        Ok(output)
    }

    /// Installed version of `name`, or an empty string if it is not installed
    pub fn version(&self, name: &str) -> Result<String> {
        Ok(self.db.version(name)?.unwrap_or_default())
    }

    /// Version an upgrade of `name` would install, or an empty string when
    /// it is already current or unknown to apt
    pub fn latest_version(&self, name: &str) -> Result<String> {
        let argv = Self::argv(&self.config.apt_cache, &["-q", "policy", name]);
        let output = self.run_checked(&argv)?;

        let latest = parse_policy(&output.stdout)
            .get(name)
            .and_then(|policy| policy.upgrade().map(str::to_string))
            .unwrap_or_default();
        debug!("Latest version of {}: '{}'", name, latest);
        Ok(latest)
    }

    /// Whether an upgrade is available for `name`
    pub fn upgrade_available(&self, name: &str) -> Result<bool> {
        Ok(!self.latest_version(name)?.is_empty())
    }

    /// Add a repository signing key.
    ///
    /// Returns `Ok(true)` if the key was added or is already present and
    /// `Ok(false)` if apt-key failed. Incomplete arguments fail with
    /// [`Error::InvocationError`] before anything runs.
    pub fn add_repo_key(&self, request: &AddKeyRequest) -> Result<bool> {
        let source = request.source()?;

        if let Some(keyid) = request.keyid() {
            match self.get_repo_keys() {
                Ok(current) if key_present(keyid, current.values()) => {
                    info!("Repository key {} is already present", keyid);
                    return Ok(true);
                }
                Ok(_) => {}
                Err(e) => warn!("Could not list repository keys: {}", e),
            }
        }

        let apt_key = self.config.apt_key.as_str();
        // A downloaded key must outlive the apt-key call
        let download = match &source {
            KeySource::Url(url) => Some(fetch_key_file(url)?),
            _ => None,
        };
        let (argv, stdin) = match (&source, &download) {
            (KeySource::File(path), _) => (Self::argv(apt_key, &["add", *path]), None),
            (KeySource::Url(_), Some(file)) => {
                let path = file.path().to_string_lossy();
                (Self::argv(apt_key, &["add", &*path]), None)
            }
            (KeySource::Text(text), _) => (Self::argv(apt_key, &["add", "-"]), Some(*text)),
            (KeySource::Keyserver { server, keyid }, _) => (
                Self::argv(apt_key, &["adv", "--keyserver", *server, "--recv", *keyid]),
                None,
            ),
            (KeySource::Url(url), None) => {
                return Err(Error::DownloadError(format!("No key downloaded from {}", url)));
            }
        };

        let output = self.runner.run_all(&argv, stdin)?;
        if output.success() {
            info!("Added repository key ({})", argv[1..].join(" "));
            Ok(true)
        } else {
            error!("Unable to add repo key: {}", output.stderr.trim());
            Ok(false)
        }
    }

    /// Remove a repository signing key
    pub fn del_repo_key(&self, keyid: &str) -> Result<bool> {
        let keyid = keyid.trim();
        if keyid.is_empty() {
            return Err(Error::InvocationError("del_repo_key requires a keyid".to_string()));
        }

        let argv = Self::argv(&self.config.apt_key, &["del", keyid]);
        let output = self.runner.run_all(&argv, None)?;
        if output.success() {
            info!("Removed repository key {}", keyid);
            Ok(true)
        } else {
            error!("Unable to remove repo key {}: {}", keyid, output.stderr.trim());
            Ok(false)
        }
    }

    /// Signing keys known to apt, by key id
    pub fn get_repo_keys(&self) -> Result<BTreeMap<String, KeyRecord>> {
        let argv = Self::argv(
            &self.config.apt_key,
            &[
                "adv",
                "--list-public-keys",
                "--with-fingerprint",
                "--with-fingerprint",
                "--with-colons",
                "--fixed-list-mode",
            ],
        );
        let output = self.run_checked(&argv)?;
        Ok(parse_key_list(&output.stdout))
    }

    /// Files of the named packages, grouped by package
    pub fn file_dict(&self, names: &[&str]) -> Result<FileDict> {
        self.db.file_dict(names)
    }

    /// Files of the named packages as one list
    pub fn file_list(&self, names: &[&str]) -> Result<FileList> {
        self.db.file_list(names)
    }

    /// dpkg selection states of the named packages (all when empty),
    /// optionally restricted to one state
    pub fn get_selections(&self, names: &[&str], state: Option<&str>) -> Result<SelectionsMap> {
        let mut args = vec!["--get-selections"];
        args.extend_from_slice(names);
        let output = self.run_checked(&Self::argv(&self.config.dpkg, &args))?;

        let filter = if names.is_empty() { None } else { Some(names) };
        let mut selections = parse_selections(&output.stdout, filter);
        if let Some(state) = state {
            selections.retain(|s, _| s == state);
        }
        Ok(selections)
    }

    /// Metadata of installed packages with presentation field names
    pub fn info_installed(&self, names: &[&str]) -> Result<BTreeMap<String, PackageRecord>> {
        let info = self
            .db
            .info(names)?
            .into_iter()
            .map(|(name, record)| (name, relabel(record, INFO_RENAMES)))
            .collect();
        Ok(info)
    }

    /// Package owning each path. One path yields [`Owner::Single`].
    ///
    /// A path shared by several packages maps to dpkg's comma-separated
    /// list (`libc6:amd64, libc6:i386`) as one string; split on `", "` to
    /// tell the packages apart.
    pub fn owner(&self, paths: &[&str]) -> Result<Owner> {
        if paths.is_empty() {
            return Err(Error::InvocationError("owner requires at least one path".to_string()));
        }

        let query = |path: &str| -> Result<String> {
            let stdout = self
                .runner
                .run_stdout(&Self::argv(&self.config.dpkg, &["-S", path]))?;
            parse_owner_line(&stdout, path)
        };

        if let [path] = paths {
            return Ok(Owner::Single(query(*path)?));
        }

        let mut owners = BTreeMap::new();
        for &path in paths {
            owners.insert(path.to_string(), query(path)?);
        }
        Ok(Owner::Multiple(owners))
    }

    /// Refresh the package index, reporting what happened to each source
    pub fn refresh_db(&self) -> Result<UpdateStatusMap> {
        let output = self.run_checked(&Self::argv(&self.config.apt_get, &["-q", "update"]))?;
        let statuses = parse_update_log(&output.stdout);
        info!("Refreshed {} package index sources", statuses.len());
        Ok(statuses)
    }
}
