// src/parsers/keys.rs

//! Parser for `apt-key adv --list-public-keys --with-colons` output
//!
//! GnuPG's colon listing spreads one key over several records. A `pub` record
//! opens a key, the next `fpr` record carries its fingerprint and the first
//! `uid` record completes it:
//!
//! ```text
//! pub:-:1024:17:46181433FBB75451:1104433784:::-:::scSC:
//! fpr:::::::::C5986B4F1257FFA86632CBA746181433FBB75451:
//! uid:-::::1104433784::B4D41942D4B35FF44182C7F9D00C99AF27B93AD0::Ubuntu CD Image <cdimage@ubuntu.com>:
//! ```
//!
//! Incomplete or malformed blocks are dropped; parsing never fails.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Public key of a repository signing keyring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub keyid: String,
    pub fingerprint: String,
    pub algorithm: u32,
    pub bits: u32,
    pub capability: String,
    /// Creation time, seconds since the epoch
    pub date_creation: Option<i64>,
    /// Expiration time, `None` for keys that never expire
    pub date_expiration: Option<i64>,
    pub uid: String,
    pub uid_hash: String,
    /// GnuPG validity code (`-`, `u`, `f`, `e`, ...)
    pub validity: String,
}

/// Key block that has seen its `pub` record but is not complete yet
#[derive(Debug, Default)]
struct PendingKey {
    keyid: String,
    fingerprint: Option<String>,
    algorithm: u32,
    bits: u32,
    capability: String,
    date_creation: Option<i64>,
    date_expiration: Option<i64>,
    validity: String,
}

#[derive(Debug, Default)]
struct KeyListState {
    pending: Option<PendingKey>,
    keys: BTreeMap<String, KeyRecord>,
}

type RecordHandler = fn(&mut KeyListState, &[&str]);

/// Record handlers keyed by the leading tag; other tags are skipped
const HANDLERS: &[(&str, RecordHandler)] = &[
    ("pub", handle_pub),
    ("fpr", handle_fpr),
    ("uid", handle_uid),
];

/// Parse colon-delimited key listing into keyid -> record
pub fn parse_key_list(output: &str) -> BTreeMap<String, KeyRecord> {
    let mut state = KeyListState::default();

    for line in output.lines() {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(':').collect();
        let Some(handler) = HANDLERS
            .iter()
            .find(|(tag, _)| *tag == fields[0])
            .map(|(_, handler)| handler)
        else {
            continue;
        };
        handler(&mut state, &fields[..]);
    }

    if let Some(pending) = state.pending.take() {
        warn!("Dropping key {} without uid record", pending.keyid);
    }

    debug!("Parsed {} repository keys", state.keys.len());
    state.keys
}

fn handle_pub(state: &mut KeyListState, fields: &[&str]) {
    if let Some(previous) = state.pending.take() {
        warn!("Dropping incomplete key block {}", previous.keyid);
    }

    if fields.len() < 12 || fields[4].is_empty() {
        warn!("Skipping malformed pub record ({} fields)", fields.len());
        return;
    }

    let (Ok(bits), Ok(algorithm)) = (fields[2].parse(), fields[3].parse()) else {
        warn!("Skipping pub record {} with non-numeric size or algorithm", fields[4]);
        return;
    };

    state.pending = Some(PendingKey {
        keyid: fields[4].to_string(),
        fingerprint: None,
        algorithm,
        bits,
        capability: fields[11].to_string(),
        date_creation: parse_epoch(fields[5]),
        date_expiration: parse_epoch(fields[6]),
        validity: fields[1].to_string(),
    });
}

fn handle_fpr(state: &mut KeyListState, fields: &[&str]) {
    let Some(pending) = state.pending.as_mut() else {
        return;
    };
    // Only the primary key's fingerprint; later fpr records belong to subkeys
    if pending.fingerprint.is_none() {
        if let Some(fingerprint) = fields.get(9).filter(|f| !f.is_empty()) {
            pending.fingerprint = Some(fingerprint.to_string());
        }
    }
}

fn handle_uid(state: &mut KeyListState, fields: &[&str]) {
    let Some(pending) = state.pending.take() else {
        return;
    };

    if fields.len() < 10 {
        warn!("Dropping key {}: malformed uid record", pending.keyid);
        return;
    }
    let Some(fingerprint) = pending.fingerprint else {
        warn!("Dropping key {}: no fingerprint record", pending.keyid);
        return;
    };

    let record = KeyRecord {
        keyid: pending.keyid.clone(),
        fingerprint,
        algorithm: pending.algorithm,
        bits: pending.bits,
        capability: pending.capability,
        date_creation: parse_epoch(fields[5]).or(pending.date_creation),
        date_expiration: pending.date_expiration,
        uid: join_uid(&fields[9..]),
        uid_hash: fields[7].to_string(),
        validity: pending.validity,
    };
    state.keys.insert(pending.keyid, record);
}

/// Re-join the user id, which may contain the delimiter itself
fn join_uid(rest: &[&str]) -> String {
    let end = rest
        .iter()
        .rposition(|field| !field.is_empty())
        .map_or(0, |pos| pos + 1);
    rest[..end].join(":").replace("\\x3a", ":")
}

fn parse_epoch(field: &str) -> Option<i64> {
    if field.is_empty() {
        None
    } else {
        field.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APT_KEY_LIST: &str = r#"
pub:-:1024:17:46181433FBB75451:1104433784:::-:::scSC:
fpr:::::::::C5986B4F1257FFA86632CBA746181433FBB75451:
uid:-::::1104433784::B4D41942D4B35FF44182C7F9D00C99AF27B93AD0::Ubuntu CD Image Automatic Signing Key <cdimage@ubuntu.com>:
"#;

    #[test]
    fn test_parse_single_key() {
        let keys = parse_key_list(APT_KEY_LIST);
        assert_eq!(keys.len(), 1);

        let key = &keys["46181433FBB75451"];
        assert_eq!(key.keyid, "46181433FBB75451");
        assert_eq!(key.fingerprint, "C5986B4F1257FFA86632CBA746181433FBB75451");
        assert_eq!(key.bits, 1024);
        assert_eq!(key.algorithm, 17);
        assert_eq!(key.capability, "scSC");
        assert_eq!(key.validity, "-");
        assert_eq!(key.date_creation, Some(1104433784));
        assert_eq!(key.date_expiration, None);
        assert_eq!(key.uid, "Ubuntu CD Image Automatic Signing Key <cdimage@ubuntu.com>");
        assert_eq!(key.uid_hash, "B4D41942D4B35FF44182C7F9D00C99AF27B93AD0");
    }

    #[test]
    fn test_parse_is_repeatable() {
        assert_eq!(parse_key_list(APT_KEY_LIST), parse_key_list(APT_KEY_LIST));
    }

    #[test]
    fn test_multiple_keys_and_subkeys() {
        let listing = "\
tru::1:1472838720:0:3:1:5
pub:-:4096:1:3B4FE6ACC0B21F32:1336770936:1652130936::-:::scSC::::::23::0:
fpr:::::::::790BC7277767219C42C86F933B4FE6ACC0B21F32:
uid:-::::1336770936::77355A0B96082B2694009775B6490C605BD16B6F::Ubuntu Archive Automatic Signing Key (2012) <ftpmaster@ubuntu.com>:
sub:-:4096:1:AAAAAAAAAAAAAAAA:1336770936::::::s:
fpr:::::::::FFFFFFFFFFFFFFFFFFFFFFFFAAAAAAAAAAAAAAAA:
pub:-:4096:1:991BC93C:1537196506:::-:::scSC:
fpr:::::::::F6ECB3762474EDA9D21B7022871920D1991BC93C:
uid:-::::1537196506::BE438F348D2BCD1C6B0F79E5C6B5B32DDA4CB8A6::Ubuntu Archive Automatic Signing Key (2018) <ftpmaster@ubuntu.com>:
";
        let keys = parse_key_list(listing);
        assert_eq!(keys.len(), 2);

        let key = &keys["3B4FE6ACC0B21F32"];
        assert_eq!(key.fingerprint, "790BC7277767219C42C86F933B4FE6ACC0B21F32");
        assert_eq!(key.date_expiration, Some(1652130936));
        assert_eq!(key.bits, 4096);
        assert_eq!(key.algorithm, 1);

        assert_eq!(
            keys["991BC93C"].uid,
            "Ubuntu Archive Automatic Signing Key (2018) <ftpmaster@ubuntu.com>"
        );
    }

    #[test]
    fn test_uid_containing_delimiter() {
        let listing = "\
pub:-:2048:1:0123456789ABCDEF:1400000000:::-:::scSC:
fpr:::::::::00000000000000000000000000000000000000AB:
uid:-::::::HASH::Example: Archive <archive@example.org>:
";
        let keys = parse_key_list(listing);
        let key = &keys["0123456789ABCDEF"];
        assert_eq!(key.uid, "Example: Archive <archive@example.org>");
        assert_eq!(key.date_creation, Some(1400000000));
    }

    #[test]
    fn test_uid_overrides_creation_date() {
        let listing = "\
pub:-:2048:1:0123456789ABCDEF::::-:::scSC:
fpr:::::::::00000000000000000000000000000000000000AB:
uid:-::::1500000000::HASH::Someone <someone@example.org>:
";
        let keys = parse_key_list(listing);
        assert_eq!(keys["0123456789ABCDEF"].date_creation, Some(1500000000));
    }

    #[test]
    fn test_incomplete_blocks_dropped() {
        let listing = "\
pub:-:1024:17:NOUIDNOUIDNOUID1:1104433784:::-:::scSC:
fpr:::::::::1111111111111111111111111111111111111111:
pub:-:1024:17:NOFPRNOFPRNOFPR2:1104433784:::-:::scSC:
uid:-::::1104433784::HASH::No fingerprint <nofpr@example.org>:
pub:-:1024
fpr:::::::::2222222222222222222222222222222222222222:
uid:-::::1104433784::HASH::Short pub <short@example.org>:
pub:-:abc:17:BADBITSBADBITS03:1104433784:::-:::scSC:
fpr:::::::::3333333333333333333333333333333333333333:
uid:-::::1104433784::HASH::Bad bits <bits@example.org>:
pub:-:1024:17:LASTLASTLASTLAST:1104433784:::-:::scSC:
fpr:::::::::4444444444444444444444444444444444444444:
";
        assert!(parse_key_list(listing).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_key_list("").is_empty());
        assert!(parse_key_list("Executing: /tmp/apt-key-gpghome/gpg.1.sh --list-keys\n").is_empty());
    }
}
