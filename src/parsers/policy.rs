// src/parsers/policy.rs

//! Parser for `apt-cache policy <names>` output

use serde::Serialize;
use std::collections::BTreeMap;

/// Installed and candidate versions of one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackagePolicy {
    pub installed: Option<String>,
    pub candidate: Option<String>,
}

impl PackagePolicy {
    /// Version an upgrade would install, if it differs from the installed one
    pub fn upgrade(&self) -> Option<&str> {
        match (&self.installed, &self.candidate) {
            (Some(installed), Some(candidate)) if installed == candidate => None,
            (_, candidate) => candidate.as_deref(),
        }
    }
}

/// Parse policy output into package name -> versions.
///
/// ```text
/// wget:
///   Installed: 1.21.2-2ubuntu1
///   Candidate: 1.21.2-2ubuntu1.1
///   Version table:
/// ```
pub fn parse_policy(output: &str) -> BTreeMap<String, PackagePolicy> {
    let mut policies = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if !line.starts_with(char::is_whitespace) {
            current = line.strip_suffix(':').map(str::to_string);
            if let Some(name) = &current {
                policies.insert(name.clone(), PackagePolicy::default());
            }
            continue;
        }

        let Some(policy) = current.as_ref().and_then(|name| policies.get_mut(name)) else {
            continue;
        };
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let value = version_value(value);
        match key {
            "Installed" => policy.installed = value,
            "Candidate" => policy.candidate = value,
            _ => {}
        }
    }

    policies
}

fn version_value(raw: &str) -> Option<String> {
    match raw.trim() {
        "" | "(none)" => None,
        version => Some(version.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = "\
wget:
  Installed: 1.21.2-2ubuntu1
  Candidate: 1.21.2-2ubuntu1.1
  Version table:
     1.21.2-2ubuntu1.1 500
        500 http://archive.ubuntu.com/ubuntu jammy-updates/main amd64 Packages
 *** 1.21.2-2ubuntu1 100
        100 /var/lib/dpkg/status
curl:
  Installed: (none)
  Candidate: 7.81.0-1ubuntu1.15
  Version table:
     7.81.0-1ubuntu1.15 500
        500 http://archive.ubuntu.com/ubuntu jammy-updates/main amd64 Packages
bash:
  Installed: 5.1-6ubuntu1
  Candidate: 5.1-6ubuntu1
";

    #[test]
    fn test_parse_policy() {
        let policies = parse_policy(POLICY);
        assert_eq!(policies.len(), 3);

        let wget = &policies["wget"];
        assert_eq!(wget.installed.as_deref(), Some("1.21.2-2ubuntu1"));
        assert_eq!(wget.candidate.as_deref(), Some("1.21.2-2ubuntu1.1"));
        assert_eq!(wget.upgrade(), Some("1.21.2-2ubuntu1.1"));

        let curl = &policies["curl"];
        assert_eq!(curl.installed, None);
        assert_eq!(curl.upgrade(), Some("7.81.0-1ubuntu1.15"));

        assert_eq!(policies["bash"].upgrade(), None);
    }

    #[test]
    fn test_epoch_versions_keep_colon() {
        let policies = parse_policy("vim:\n  Installed: 2:8.2.3995-1ubuntu2\n  Candidate: 2:8.2.3995-1ubuntu2.15\n");
        assert_eq!(policies["vim"].candidate.as_deref(), Some("2:8.2.3995-1ubuntu2.15"));
    }

    #[test]
    fn test_unknown_package() {
        assert!(parse_policy("N: Unable to locate package nosuchpkg\n").is_empty());
    }
}
