// src/cli/repo.rs
//! Repository commands: signing keys and index refresh

use clap::Subcommand;

#[derive(Subcommand)]
pub enum RepoCommands {
    /// Add a repository signing key
    ///
    /// The key comes from the first of: --path, --text, --keyserver with
    /// --keyid.
    AddKey {
        /// Local path or http(s) URL of the key file
        #[arg(long)]
        path: Option<String>,

        /// Armored key text ("-" reads it from stdin)
        #[arg(long)]
        text: Option<String>,

        /// Keyserver to receive the key from
        #[arg(long)]
        keyserver: Option<String>,

        /// Key id (required with --keyserver)
        #[arg(long)]
        keyid: Option<String>,
    },

    /// Remove a repository signing key
    DelKey {
        /// Key id
        keyid: String,
    },

    /// List repository signing keys
    Keys,

    /// Refresh the package index
    Refresh,
}
