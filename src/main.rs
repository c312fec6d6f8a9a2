// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use aptpkg::{Apt, AptConfig, Dpkg, SystemRunner};
use clap::Parser;
use cli::{Cli, Commands, QueryCommands, RepoCommands};
use std::path::Path;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging; stdout carries the JSON result
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = AptConfig::load_or_default(Path::new(&cli.config))?;
    debug!("Using configuration: {:?}", config);

    let runner = SystemRunner::new(config.env_pairs());
    let apt = Apt::new(&runner, Dpkg::new(&runner, config.clone()), config);

    match cli.command {
        Commands::Query(command) => match command {
            QueryCommands::Version { name } => commands::cmd_version(&apt, &name),
            QueryCommands::LatestVersion { name } => commands::cmd_latest_version(&apt, &name),
            QueryCommands::UpgradeAvailable { name } => {
                commands::cmd_upgrade_available(&apt, &name)
            }
            QueryCommands::FileDict { names } => commands::cmd_file_dict(&apt, &names),
            QueryCommands::FileList { names } => commands::cmd_file_list(&apt, &names),
            QueryCommands::Selections { names, state } => {
                commands::cmd_selections(&apt, &names, state.as_deref())
            }
            QueryCommands::Info { names } => commands::cmd_info(&apt, &names),
            QueryCommands::Owner { paths } => commands::cmd_owner(&apt, &paths),
        },
        Commands::Repo(command) => match command {
            RepoCommands::AddKey {
                path,
                text,
                keyserver,
                keyid,
            } => commands::cmd_add_key(&apt, path, text, keyserver, keyid),
            RepoCommands::DelKey { keyid } => commands::cmd_del_key(&apt, &keyid),
            RepoCommands::Keys => commands::cmd_keys(&apt),
            RepoCommands::Refresh => commands::cmd_refresh(&apt),
        },
    }
}
