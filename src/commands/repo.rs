// src/commands/repo.rs
//! Repository key and index commands

use super::{print_json, SystemApt};
use anyhow::{Context, Result};
use aptpkg::AddKeyRequest;
use std::io::Read;
use tracing::info;

pub fn cmd_add_key(
    apt: &SystemApt<'_>,
    path: Option<String>,
    text: Option<String>,
    keyserver: Option<String>,
    keyid: Option<String>,
) -> Result<()> {
    let text = match text.as_deref() {
        Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read key from stdin")?;
            Some(buffer)
        }
        _ => text,
    };

    let request = AddKeyRequest {
        path,
        text,
        keyserver,
        keyid,
    };
    if !apt.add_repo_key(&request)? {
        anyhow::bail!("Failed to add repository key");
    }
    print_json(&true)
}

pub fn cmd_del_key(apt: &SystemApt<'_>, keyid: &str) -> Result<()> {
    if !apt.del_repo_key(keyid)? {
        anyhow::bail!("Failed to remove repository key {}", keyid);
    }
    print_json(&true)
}

pub fn cmd_keys(apt: &SystemApt<'_>) -> Result<()> {
    print_json(&apt.get_repo_keys()?)
}

pub fn cmd_refresh(apt: &SystemApt<'_>) -> Result<()> {
    let statuses = apt.refresh_db()?;
    let fetched = statuses.values().filter(|s| s.as_option() == Some(true)).count();
    info!("{} of {} sources fetched", fetched, statuses.len());
    print_json(&statuses)
}
