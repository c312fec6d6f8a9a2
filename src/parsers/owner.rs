// src/parsers/owner.rs

//! Parser for `dpkg -S <path>` output

use crate::error::{Error, Result};

/// Extract the owning package from `dpkg -S` output for `path`.
///
/// Output has the form `package: /path`; shared paths list several
/// packages (`a, b: /path`), returned verbatim. Diversion notices and
/// dpkg's own diagnostics are skipped.
pub fn parse_owner_line(output: &str, path: &str) -> Result<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_notice(line))
        .find_map(|line| line.split_once(": ").map(|(name, _)| name.trim().to_string()))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::NotFoundError(format!("No package owns path '{}'", path)))
}

fn is_notice(line: &str) -> bool {
    ["diversion by", "local diversion", "dpkg-query:", "dpkg:"]
        .iter()
        .any(|prefix| line.starts_with(prefix))
}
