// src/apt/keys.rs

//! Argument handling for repository signing keys

use crate::error::{Error, Result};
use crate::parsers::KeyRecord;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;
use url::Url;

/// Arguments of `add_repo_key`. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct AddKeyRequest {
    /// Local path or http(s) URL of an armored key file
    pub path: Option<String>,
    /// Key material passed on stdin
    pub text: Option<String>,
    pub keyserver: Option<String>,
    pub keyid: Option<String>,
}

/// Where the key comes from, once the request has been validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource<'a> {
    File(&'a str),
    Url(Url),
    Text(&'a str),
    Keyserver { server: &'a str, keyid: &'a str },
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AddKeyRequest {
    pub fn keyserver(server: &str, keyid: &str) -> Self {
        Self {
            keyserver: Some(server.to_string()),
            keyid: Some(keyid.to_string()),
            ..Default::default()
        }
    }

    pub fn file(path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// The key id to check against installed keys, if one was given
    pub fn keyid(&self) -> Option<&str> {
        present(&self.keyid)
    }

    /// Resolve the request into a key source.
    ///
    /// Precedence is path, then text, then keyserver. A keyserver without a
    /// key id, or a key id without a keyserver, is an invocation error.
    pub fn source(&self) -> Result<KeySource<'_>> {
        if let Some(path) = present(&self.path) {
            return Ok(match Url::parse(path) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => KeySource::Url(url),
                _ => KeySource::File(path),
            });
        }
        if let Some(text) = present(&self.text) {
            return Ok(KeySource::Text(text));
        }
        match (present(&self.keyserver), self.keyid()) {
            (Some(server), Some(keyid)) if normalize_keyid(keyid).is_some() => {
                Ok(KeySource::Keyserver { server, keyid })
            }
            (Some(server), _) => Err(Error::InvocationError(format!(
                "No keyid or keyid too short for keyserver: {}",
                server
            ))),
            (None, Some(keyid)) => Err(Error::InvocationError(format!(
                "No keyserver specified for keyid: {}",
                keyid
            ))),
            (None, None) => Err(Error::InvocationError(
                "add_repo_key requires a path, text, or keyserver and keyid".to_string(),
            )),
        }
    }
}

/// Upper-cased hex key id without a `0x` prefix, `None` unless it has at
/// least 8 hex digits
fn normalize_keyid(keyid: &str) -> Option<String> {
    let hex = keyid
        .strip_prefix("0x")
        .or_else(|| keyid.strip_prefix("0X"))
        .unwrap_or(keyid);
    if hex.len() < MIN_KEYID_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(hex.to_ascii_uppercase())
}

const MIN_KEYID_LEN: usize = 8;

/// Whether `keyid` names one of `installed`.
///
/// Accepts the short (8), long (16) or full fingerprint form; anything
/// else never matches.
pub fn key_present<'a>(keyid: &str, installed: impl IntoIterator<Item = &'a KeyRecord>) -> bool {
    let Some(wanted) = normalize_keyid(keyid) else {
        return false;
    };
    installed.into_iter().any(|key| {
        let fingerprint = key.fingerprint.to_ascii_uppercase();
        let long_id = key.keyid.to_ascii_uppercase();
        let short_id = long_id
            .get(long_id.len().saturating_sub(MIN_KEYID_LEN)..)
            .unwrap_or(&long_id);
        wanted == fingerprint || wanted == long_id || wanted == short_id
    })
}

/// Download a remote key file into a temporary file
pub fn fetch_key_file(url: &Url) -> Result<NamedTempFile> {
    debug!("Downloading signing key from {}", url);

    let response = reqwest::blocking::get(url.as_str())
        .map_err(|e| Error::DownloadError(format!("Failed to fetch {}: {}", url, e)))?;
    if !response.status().is_success() {
        return Err(Error::DownloadError(format!(
            "Failed to fetch {}: HTTP {}",
            url,
            response.status()
        )));
    }
    let body = response
        .bytes()
        .map_err(|e| Error::DownloadError(format!("Failed to read {}: {}", url, e)))?;

    let mut file = NamedTempFile::new()?;
    file.write_all(&body)?;
    file.flush()?;
    Ok(file)
}
