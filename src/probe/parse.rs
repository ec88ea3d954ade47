// src/probe/parse.rs

//! Parsing of `java -version` diagnostic text.
//!
//! Two explicit branches:
//! - direct: `openjdk version "17.0.1"` → major is the first component;
//! - legacy epoch: `java version "1.8.0_301"` → the leading `1` is an epoch
//!   marker and the major is the second component.

use std::sync::LazyLock;

use regex::Regex;

/// First quoted version after the word `version`; group 1 is the leading component.
static DIRECT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"version "(\d+)\.?\d*\.?\d*[^"]*""#).expect("valid direct version regex")
});

/// Legacy `1.N` form; group 1 is `N`.
static LEGACY_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"version "1\.(\d+)"#).expect("valid legacy version regex")
});

/// Leading component that marks the legacy `1.N.x` scheme.
pub const LEGACY_EPOCH: u32 = 1;

/// Structured result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    /// Full match, e.g. `version "17.0.1"`.
    pub raw: String,
    /// Leading component as printed, e.g. `"1"` for `1.8.0_301`.
    pub token: String,
    pub major: u32,
}

/// Parse the major version out of free-form `-version` output.
///
/// Returns `None` when no quoted version can be found.
pub fn parse_java_version(output: &str) -> Option<ParsedVersion> {
    let caps = DIRECT_VERSION.captures(output)?;
    let raw = caps.get(0)?.as_str().to_string();
    let token = caps.get(1)?.as_str().to_string();
    let leading: u32 = token.parse().ok()?;

    let major = if leading == LEGACY_EPOCH {
        parse_legacy_major(output).unwrap_or(leading)
    } else {
        leading
    };

    Some(ParsedVersion { raw, token, major })
}

fn parse_legacy_major(output: &str) -> Option<u32> {
    LEGACY_VERSION
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
