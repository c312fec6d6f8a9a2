// src/cli/query.rs
//! Query commands: versions, files, selections, metadata, ownership

use clap::Subcommand;

#[derive(Subcommand)]
pub enum QueryCommands {
    /// Show the installed version of a package (empty if not installed)
    Version {
        /// Package name
        name: String,
    },

    /// Show the version an upgrade would install (empty if current)
    LatestVersion {
        /// Package name
        name: String,
    },

    /// Check whether an upgrade is available
    UpgradeAvailable {
        /// Package name
        name: String,
    },

    /// List files grouped by package
    FileDict {
        /// Package names (all installed packages when omitted)
        names: Vec<String>,
    },

    /// List files of packages as one list
    FileList {
        /// Package names (all installed packages when omitted)
        names: Vec<String>,
    },

    /// Show dpkg selection states
    Selections {
        /// Package names (all packages when omitted)
        names: Vec<String>,

        /// Only show packages in this state (install, hold, deinstall, purge)
        #[arg(long)]
        state: Option<String>,
    },

    /// Show metadata of installed packages
    Info {
        /// Package names (all installed packages when omitted)
        names: Vec<String>,
    },

    /// Find the package owning each path
    Owner {
        /// File paths
        #[arg(required = true)]
        paths: Vec<String>,
    },
}
