// src/lib.rs

//! aptpkg
//!
//! Structured access to the Debian package toolchain. Requests such as
//! "which version is installed", "add this signing key" or "refresh the
//! package index" become `apt-get`, `apt-cache`, `apt-key` and `dpkg`
//! invocations, and their line-oriented output is parsed back into maps,
//! lists and booleans.
//!
//! # Architecture
//!
//! - `parsers`: pure functions over tool output, one per tool
//! - `exec`: the command execution port and its process-backed runner
//! - `dpkg`: the installed-package database port and its dpkg implementation
//! - `apt`: the facade, with its collaborators injected at construction

pub mod apt;
pub mod config;
pub mod dpkg;
mod error;
pub mod exec;
pub mod parsers;

pub use apt::{AddKeyRequest, Apt, KeySource, Owner};
pub use config::{AptConfig, DEFAULT_CONFIG_PATH};
pub use dpkg::{Dpkg, FileDict, FileList, PackageDatabase};
pub use error::{Error, Result};
pub use exec::{CommandOutput, CommandRunner, SystemRunner};
pub use parsers::{KeyRecord, PackagePolicy, PackageRecord, SelectionsMap, SourceStatus, UpdateStatusMap};
