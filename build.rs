// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Common argument: package names
fn names_arg() -> Arg {
    Arg::new("names")
        .num_args(0..)
        .help("Package names (all packages when omitted)")
}

fn query_command() -> Command {
    Command::new("query")
        .about("Query installed packages")
        .subcommand(
            Command::new("version")
                .about("Show the installed version of a package")
                .arg(Arg::new("name").required(true).help("Package name")),
        )
        .subcommand(
            Command::new("latest-version")
                .about("Show the version an upgrade would install")
                .arg(Arg::new("name").required(true).help("Package name")),
        )
        .subcommand(
            Command::new("upgrade-available")
                .about("Check whether an upgrade is available")
                .arg(Arg::new("name").required(true).help("Package name")),
        )
        .subcommand(
            Command::new("file-dict")
                .about("List files grouped by package")
                .arg(names_arg()),
        )
        .subcommand(
            Command::new("file-list")
                .about("List files of packages as one list")
                .arg(names_arg()),
        )
        .subcommand(
            Command::new("selections")
                .about("Show dpkg selection states")
                .arg(names_arg())
                .arg(Arg::new("state").long("state").help("Only show packages in this state")),
        )
        .subcommand(
            Command::new("info")
                .about("Show metadata of installed packages")
                .arg(names_arg()),
        )
        .subcommand(
            Command::new("owner")
                .about("Find the package owning each path")
                .arg(Arg::new("paths").required(true).num_args(1..).help("File paths")),
        )
}

fn repo_command() -> Command {
    Command::new("repo")
        .about("Manage repository keys and the package index")
        .subcommand(
            Command::new("add-key")
                .about("Add a repository signing key")
                .arg(Arg::new("path").long("path").help("Local path or http(s) URL of the key file"))
                .arg(Arg::new("text").long("text").help("Armored key text (- reads stdin)"))
                .arg(Arg::new("keyserver").long("keyserver").help("Keyserver to receive the key from"))
                .arg(Arg::new("keyid").long("keyid").help("Key id (required with --keyserver)")),
        )
        .subcommand(
            Command::new("del-key")
                .about("Remove a repository signing key")
                .arg(Arg::new("keyid").required(true).help("Key id")),
        )
        .subcommand(Command::new("keys").about("List repository signing keys"))
        .subcommand(Command::new("refresh").about("Refresh the package index"))
}

fn build_cli() -> Command {
    Command::new("aptpkg")
        .version(env!("CARGO_PKG_VERSION"))
        .author("aptpkg Contributors")
        .about("Structured access to apt, apt-key and dpkg")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .default_value("/etc/aptpkg/config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(query_command())
        .subcommand(repo_command())
}

/// Render `aptpkg.1` into `man_dir`, returning the written path
fn write_man_page(man_dir: &Path) -> Result<PathBuf, String> {
    fs::create_dir_all(man_dir)
        .map_err(|e| format!("Failed to create {}: {}", man_dir.display(), e))?;

    let mut buffer = Vec::new();
    Man::new(build_cli())
        .render(&mut buffer)
        .map_err(|e| format!("Failed to render man page: {}", e))?;

    let man_path = man_dir.join("aptpkg.1");
    fs::write(&man_path, buffer)
        .map_err(|e| format!("Failed to write {}: {}", man_path.display(), e))?;
    Ok(man_path)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set, skipping man page");
        return;
    };
    if let Err(e) = write_man_page(&PathBuf::from(manifest_dir).join("man")) {
        println!("cargo:warning={}", e);
    }
}
