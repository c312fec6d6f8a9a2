// src/commands/query.rs
//! Query commands over the installed-package database

use super::{as_strs, print_json, SystemApt};
use anyhow::Result;
use tracing::debug;

pub fn cmd_version(apt: &SystemApt<'_>, name: &str) -> Result<()> {
    print_json(&apt.version(name)?)
}

pub fn cmd_latest_version(apt: &SystemApt<'_>, name: &str) -> Result<()> {
    print_json(&apt.latest_version(name)?)
}

pub fn cmd_upgrade_available(apt: &SystemApt<'_>, name: &str) -> Result<()> {
    print_json(&apt.upgrade_available(name)?)
}

pub fn cmd_file_dict(apt: &SystemApt<'_>, names: &[String]) -> Result<()> {
    let dict = apt.file_dict(&as_strs(names))?;
    debug!("{} packages listed, {} errors", dict.packages.len(), dict.errors.len());
    print_json(&dict)
}

pub fn cmd_file_list(apt: &SystemApt<'_>, names: &[String]) -> Result<()> {
    print_json(&apt.file_list(&as_strs(names))?)
}

pub fn cmd_selections(apt: &SystemApt<'_>, names: &[String], state: Option<&str>) -> Result<()> {
    print_json(&apt.get_selections(&as_strs(names), state)?)
}

pub fn cmd_info(apt: &SystemApt<'_>, names: &[String]) -> Result<()> {
    print_json(&apt.info_installed(&as_strs(names))?)
}

pub fn cmd_owner(apt: &SystemApt<'_>, paths: &[String]) -> Result<()> {
    print_json(&apt.owner(&as_strs(paths))?)
}
