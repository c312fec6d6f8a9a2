// src/commands/mod.rs
//! Command handlers for the aptpkg CLI

mod query;
mod repo;

pub use query::{
    cmd_file_dict, cmd_file_list, cmd_info, cmd_latest_version, cmd_owner, cmd_selections,
    cmd_upgrade_available, cmd_version,
};
pub use repo::{cmd_add_key, cmd_del_key, cmd_keys, cmd_refresh};

use anyhow::Result;
use aptpkg::{Apt, Dpkg, SystemRunner};
use serde::Serialize;

/// Facade wired to real processes
pub type SystemApt<'a> = Apt<&'a SystemRunner, Dpkg<&'a SystemRunner>>;

/// Print a result as pretty JSON on stdout
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}
