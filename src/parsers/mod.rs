// src/parsers/mod.rs

//! Parsers for apt and dpkg tool output
//!
//! Every parser is a pure function of its input text. Malformed fragments
//! are dropped rather than reported; only the facade turns whole-operation
//! failures into errors.

pub mod keys;
pub mod owner;
pub mod policy;
pub mod relabel;
pub mod selections;
pub mod update;

pub use keys::{parse_key_list, KeyRecord};
pub use owner::parse_owner_line;
pub use policy::{parse_policy, PackagePolicy};
pub use relabel::{invert, relabel, PackageRecord, INFO_RENAMES};
pub use selections::{parse_selections, SelectionsMap};
pub use update::{parse_update_log, SourceStatus, UpdateStatusMap};
