// src/parsers/selections.rs

//! Parser for `dpkg --get-selections` output

use std::collections::BTreeMap;

/// Selection state -> package names in the order dpkg listed them
pub type SelectionsMap = BTreeMap<String, Vec<String>>;

/// Group `<name> <state>` lines by state.
///
/// When `filter` is given, rows for other packages are dropped before
/// grouping.
pub fn parse_selections(output: &str, filter: Option<&[&str]>) -> SelectionsMap {
    let mut selections = SelectionsMap::new();

    for line in output.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (Some(name), Some(state)) = (tokens.first(), tokens.last()) else {
            continue;
        };
        if tokens.len() < 2 {
            continue;
        }
        if let Some(names) = filter {
            if !names.contains(name) {
                continue;
            }
        }

        selections
            .entry(state.to_string())
            .or_default()
            .push(name.to_string());
    }

    selections
}
