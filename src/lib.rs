//! Villa library exports: the navigation engine and its host abstractions.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod api;
pub mod core;
pub mod host;
pub mod repl;

#[cfg(test)]
pub mod test_support;

/// How page ids appear in the address bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorKind {
    /// `/{page}`, driven by pop-state.
    #[default]
    Path,
    /// `/#/{page}`, driven by hash-change.
    Hash,
}

impl LocatorKind {
    /// Case-insensitive; unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "path" => Some(LocatorKind::Path),
            "hash" => Some(LocatorKind::Hash),
            _ => None,
        }
    }
}
