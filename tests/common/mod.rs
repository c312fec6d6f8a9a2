// tests/common/mod.rs

//! Shared test doubles and fixtures for integration tests.

#![allow(dead_code)]

use aptpkg::{
    CommandOutput, CommandRunner, Error, FileDict, PackageDatabase, PackageRecord, Result,
};
use std::cell::RefCell;
use std::collections::BTreeMap;

pub const APT_KEY_LIST: &str = r#"
pub:-:1024:17:46181433FBB75451:1104433784:::-:::scSC:
fpr:::::::::C5986B4F1257FFA86632CBA746181433FBB75451:
uid:-::::1104433784::B4D41942D4B35FF44182C7F9D00C99AF27B93AD0::Ubuntu CD Image Automatic Signing Key <cdimage@ubuntu.com>:
"#;

pub const APT_Q_UPDATE: &str = "
Get:1 http://security.ubuntu.com trusty-security InRelease [65 kB]
Get:2 http://security.ubuntu.com trusty-security/main Sources [120 kB]
Get:3 http://security.ubuntu.com trusty-security/main amd64 Packages [548 kB]
Get:4 http://security.ubuntu.com trusty-security/main i386 Packages [507 kB]
Hit http://security.ubuntu.com trusty-security/main Translation-en
Fetched 1240 kB in 10s (124 kB/s)
Reading package lists...
";

pub const WGET_FILES: &[&str] = &[
    "/.",
    "/etc",
    "/etc/wgetrc",
    "/usr",
    "/usr/bin",
    "/usr/bin/wget",
    "/usr/share",
    "/usr/share/info",
    "/usr/share/info/wget.info.gz",
    "/usr/share/doc",
    "/usr/share/doc/wget",
    "/usr/share/doc/wget/MAILING-LIST",
    "/usr/share/doc/wget/NEWS.gz",
    "/usr/share/doc/wget/AUTHORS",
    "/usr/share/doc/wget/copyright",
    "/usr/share/doc/wget/changelog.Debian.gz",
    "/usr/share/doc/wget/README",
    "/usr/share/man",
    "/usr/share/man/man1",
    "/usr/share/man/man1/wget.1.gz",
];

/// Raw dpkg metadata for wget
pub fn wget_info() -> PackageRecord {
    [
        ("architecture", "amd64"),
        ("description", "retrieves files from the web"),
        ("homepage", "http://www.gnu.org/software/wget/"),
        ("install_date", "2016-08-30T22:20:15Z"),
        ("maintainer", "Ubuntu Developers <ubuntu-devel-discuss@lists.ubuntu.com>"),
        ("name", "wget"),
        ("section", "web"),
        ("source", "wget"),
        ("version", "1.15-1ubuntu1.14.04.2"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn wget_files() -> FileDict {
    let mut dict = FileDict::default();
    dict.packages.insert(
        "wget".to_string(),
        WGET_FILES.iter().map(|f| f.to_string()).collect(),
    );
    dict
}

pub fn output(retcode: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        retcode,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

pub fn ok(stdout: &str) -> CommandOutput {
    output(0, stdout, "")
}

/// Command runner answering from a script.
///
/// A response matches when every one of its needles appears as a whole
/// argument of the command line; the first registered match wins. Every call
/// is recorded with its stdin.
#[derive(Default)]
pub struct FakeRunner {
    responses: Vec<(Vec<String>, CommandOutput)>,
    calls: RefCell<Vec<(Vec<String>, Option<String>)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, needles: &[&str], output: CommandOutput) -> Self {
        self.responses
            .push((needles.iter().map(|n| n.to_string()).collect(), output));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|(argv, _)| argv.clone()).collect()
    }

    pub fn stdin_of(&self, index: usize) -> Option<String> {
        self.calls.borrow().get(index).and_then(|(_, stdin)| stdin.clone())
    }

    /// Whether any recorded call contains every needle
    pub fn called_with(&self, needles: &[&str]) -> bool {
        self.calls()
            .iter()
            .any(|argv| needles.iter().all(|n| argv.iter().any(|a| a == n)))
    }
}

impl CommandRunner for FakeRunner {
    fn run_all(&self, argv: &[String], stdin: Option<&str>) -> Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push((argv.to_vec(), stdin.map(str::to_string)));

        self.responses
            .iter()
            .find(|(needles, _)| needles.iter().all(|n| argv.contains(n)))
            .map(|(_, output)| output.clone())
            .ok_or_else(|| Error::ToolNotFound(format!("unscripted command: {}", argv.join(" "))))
    }
}

/// In-memory package database
#[derive(Default)]
pub struct FakeDatabase {
    pub versions: BTreeMap<String, String>,
    pub info: BTreeMap<String, PackageRecord>,
    pub files: FileDict,
}

impl FakeDatabase {
    pub fn with_wget() -> Self {
        let mut db = Self::default();
        db.versions
            .insert("wget".to_string(), "1.15-1ubuntu1.14.04.2".to_string());
        db.info.insert("wget".to_string(), wget_info());
        db.files = wget_files();
        db
    }
}

impl PackageDatabase for FakeDatabase {
    fn version(&self, name: &str) -> Result<Option<String>> {
        Ok(self.versions.get(name).cloned())
    }

    fn info(&self, names: &[&str]) -> Result<BTreeMap<String, PackageRecord>> {
        Ok(self
            .info
            .iter()
            .filter(|(name, _)| names.is_empty() || names.contains(&name.as_str()))
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect())
    }

    fn file_dict(&self, names: &[&str]) -> Result<FileDict> {
        let mut dict = FileDict::default();
        for name in names {
            match self.files.packages.get(*name) {
                Some(files) => {
                    dict.packages.insert(name.to_string(), files.clone());
                }
                None => {
                    dict.errors
                        .insert(name.to_string(), format!("package '{}' is not installed", name));
                }
            }
        }
        Ok(dict)
    }
}
