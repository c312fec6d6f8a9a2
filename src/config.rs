// src/config.rs

//! Tool locations and environment for the apt facade
//!
//! Loaded from a TOML file; every field has a default so an empty file (or no
//! file at all) yields a working Debian configuration:
//!
//! ```toml
//! apt_get = "/usr/bin/apt-get"
//! dpkg_info_dir = "/var/lib/dpkg/info"
//!
//! [env]
//! DEBIAN_FRONTEND = "noninteractive"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/aptpkg/config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AptConfig {
    pub apt_get: String,
    pub apt_cache: String,
    pub apt_key: String,
    pub dpkg: String,
    pub dpkg_query: String,

    /// Directory holding dpkg's per-package `.list` files
    pub dpkg_info_dir: PathBuf,

    /// Environment applied to every spawned command
    pub env: BTreeMap<String, String>,
}

impl Default for AptConfig {
    fn default() -> Self {
        let mut env = BTreeMap::new();
        env.insert("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string());
        env.insert("APT_LISTBUGS_FRONTEND".to_string(), "none".to_string());
        env.insert("APT_LISTCHANGES_FRONTEND".to_string(), "none".to_string());

        Self {
            apt_get: "apt-get".to_string(),
            apt_cache: "apt-cache".to_string(),
            apt_key: "apt-key".to_string(),
            dpkg: "dpkg".to_string(),
            dpkg_query: "dpkg-query".to_string(),
            dpkg_info_dir: PathBuf::from("/var/lib/dpkg/info"),
            env,
        }
    }
}

impl AptConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)
            .map_err(|e| Error::ParseError(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AptConfig =
            toml::from_str(content).map_err(|e| Error::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let tools = [
            ("apt_get", &self.apt_get),
            ("apt_cache", &self.apt_cache),
            ("apt_key", &self.apt_key),
            ("dpkg", &self.dpkg),
            ("dpkg_query", &self.dpkg_query),
        ];
        for (field, value) in tools {
            if value.trim().is_empty() {
                return Err(Error::ConfigError(format!("{} must not be empty", field)));
            }
        }
        if self.dpkg_info_dir.as_os_str().is_empty() {
            return Err(Error::ConfigError("dpkg_info_dir must not be empty".to_string()));
        }
        Ok(())
    }

    /// Environment as key/value pairs for [`crate::exec::SystemRunner`]
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        self.env.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AptConfig::from_toml("").unwrap();
        assert_eq!(config, AptConfig::default());
        assert_eq!(config.env.get("DEBIAN_FRONTEND").unwrap(), "noninteractive");
    }

    #[test]
    fn test_overrides() {
        let toml_str = r#"
apt_get = "/usr/local/bin/apt-get"
dpkg_info_dir = "/srv/root/var/lib/dpkg/info"

[env]
LC_ALL = "C"
"#;
        let config = AptConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.apt_get, "/usr/local/bin/apt-get");
        assert_eq!(config.apt_key, "apt-key");
        assert_eq!(config.dpkg_info_dir, PathBuf::from("/srv/root/var/lib/dpkg/info"));
        assert_eq!(config.env_pairs(), vec![("LC_ALL".to_string(), "C".to_string())]);
    }

    #[test]
    fn test_empty_tool_rejected() {
        let err = AptConfig::from_toml("dpkg = \"\"").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = AptConfig::from_toml("apt_get = [").unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = AptConfig::load_or_default(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AptConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "apt_cache = \"/opt/apt-cache\"\n").unwrap();

        let config = AptConfig::load(&path).unwrap();
        assert_eq!(config.apt_cache, "/opt/apt-cache");
    }
}
