// src/parsers/update.rs

//! Parser for `apt-get update` progress output

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome for one index file during a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// Downloaded (`Get:`)
    Fetched,
    /// Already up to date (`Hit`)
    Current,
    /// Failed or ignored (`Err`, `Ign`)
    Failed,
}

impl SourceStatus {
    /// Tri-state form: `Some(true)` fetched, `None` current, `Some(false)` failed
    pub fn as_option(self) -> Option<bool> {
        match self {
            Self::Fetched => Some(true),
            Self::Current => None,
            Self::Failed => Some(false),
        }
    }
}

impl Serialize for SourceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

/// Source label -> status for every index line apt reported
pub type UpdateStatusMap = BTreeMap<String, SourceStatus>;

/// Leading tag (without the `:<n>` counter) -> status
const LINE_TAGS: &[(&str, SourceStatus)] = &[
    ("Get", SourceStatus::Fetched),
    ("Hit", SourceStatus::Current),
    ("Err", SourceStatus::Failed),
    ("Ign", SourceStatus::Failed),
];

/// Parse `apt-get update` output. Banners and continuation lines are
/// ignored; a label seen twice keeps its last status.
pub fn parse_update_log(output: &str) -> UpdateStatusMap {
    let mut statuses = UpdateStatusMap::new();

    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        let tag = first.split(':').next().unwrap_or(first);
        let Some(status) = LINE_TAGS
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, status)| *status)
        else {
            continue;
        };

        let label = tokens.collect::<Vec<_>>().join(" ");
        let label = match status {
            SourceStatus::Fetched => strip_size(&label),
            _ => label.as_str(),
        };
        if label.is_empty() {
            continue;
        }

        statuses.insert(label.to_string(), status);
    }

    debug!("Parsed {} source statuses", statuses.len());
    statuses
}

/// Strip a trailing download size such as ` [65 kB]`
fn strip_size(label: &str) -> &str {
    if let Some(start) = label.rfind(" [") {
        let size = &label[start + 2..];
        if size.ends_with("B]") {
            return &label[..start];
        }
    }
    label
}
