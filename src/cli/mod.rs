// src/cli/mod.rs
//! CLI definitions for aptpkg
//!
//! Command implementations live in the `commands` module. Every command
//! prints its result as JSON on stdout; logs go to stderr.
//!
//! - `query` - installed versions, files, selections, metadata, ownership
//! - `repo` - signing keys and index refresh

use aptpkg::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};

mod query;
mod repo;

pub use query::QueryCommands;
pub use repo::RepoCommands;

#[derive(Parser)]
#[command(name = "aptpkg")]
#[command(author = "aptpkg Contributors")]
#[command(version)]
#[command(about = "Structured access to apt, apt-key and dpkg", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query installed packages
    #[command(subcommand)]
    Query(QueryCommands),

    /// Manage repository keys and the package index
    #[command(subcommand)]
    Repo(RepoCommands),
}
