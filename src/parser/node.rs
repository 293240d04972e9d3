//! npm/yarn version specification parser
//!
//! Handles version formats:
//! - Exact: `1.2.3`, `=1.2.3`
//! - Caret: `^1.2.3`
//! - Tilde: `~1.2.3`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Partial: `^2.0`, `~1.2`, `>=2` (operators), `1.2` (bare, an x-range)
//! - Wildcard: `*`, `1.x`, `1.2.*`
//! - Range: `>=1.0.0 <2.0.0`, `1.0.0 - 2.0.0`, `^1.0.0 || ^2.0.0`

use crate::domain::{VersionSpec, VersionSpecKind};
use regex::Regex;
use std::sync::LazyLock;

const VERSION: &str = r"v?(\d+\.\d+\.\d+(?:-[\w.]+)?(?:\+[\w.]+)?)";
// After an operator a version may be partial: `^2`, `~1.2`
const PARTIAL_VERSION: &str = r"v?(\d+(?:\.\d+(?:\.\d+(?:-[\w.]+)?(?:\+[\w.]+)?)?)?)";

// Operator patterns, longest operator first so `>=` wins over `>`
static OPERATOR_RES: LazyLock<Vec<(Regex, VersionSpecKind, &'static str)>> = LazyLock::new(|| {
    [
        ("^", VersionSpecKind::Caret),
        ("~", VersionSpecKind::Tilde),
        (">=", VersionSpecKind::GreaterOrEqual),
        ("<=", VersionSpecKind::LessOrEqual),
        (">", VersionSpecKind::Greater),
        ("<", VersionSpecKind::Less),
        ("=", VersionSpecKind::Equal),
    ]
    .into_iter()
    .map(|(op, kind)| {
        let re = Regex::new(&format!(r"^{}\s*{}$", regex::escape(op), PARTIAL_VERSION)).unwrap();
        (re, kind, op)
    })
    .collect()
});
static EXACT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(r"^{}$", VERSION)).unwrap());
static WILDCARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?\.)?[xX*]$|^\d+(?:\.\d+)?$|^\*$|^$").unwrap());
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\sv\d.xX*^~<>=|\-+\w]+$").unwrap());

/// Protocols that are not semver ranges and are never bumped
const NON_SEMVER_PREFIXES: &[&str] = &[
    "workspace:",
    "file:",
    "link:",
    "portal:",
    "patch:",
    "npm:",
    "git",
    "http:",
    "https:",
    "github:",
];

/// npm version specification parser
pub struct NodeVersionParser;

impl NodeVersionParser {
    /// Parse a declared range into a specification
    ///
    /// Returns `None` for protocols that do not describe a semver range
    /// (`workspace:`, `file:`, git URLs, aliases, ...).
    pub fn parse(&self, version_str: &str) -> Option<VersionSpec> {
        let trimmed = version_str.trim();

        if is_non_semver(trimmed) {
            return None;
        }

        for (re, kind, op) in OPERATOR_RES.iter() {
            if let Some(caps) = re.captures(trimmed) {
                let version = caps.get(1)?.as_str();
                return Some(VersionSpec::new(*kind, trimmed, version).with_prefix(*op));
            }
        }

        // Check for exact version (1.2.3)
        if let Some(caps) = EXACT_RE.captures(trimmed) {
            let version = caps.get(1)?.as_str();
            return Some(VersionSpec::new(VersionSpecKind::Exact, trimmed, version));
        }

        // Check for wildcard (*, 1.x, 1.2.*, 1.2), an empty range means any version
        if WILDCARD_RE.is_match(trimmed) {
            return Some(VersionSpec::new(
                VersionSpecKind::Wildcard,
                trimmed,
                trimmed.trim_end_matches(['x', 'X', '*']).trim_end_matches('.'),
            ));
        }

        // Anything else made of comparator characters is a compound range
        if RANGE_RE.is_match(trimmed) {
            let first_version = trimmed
                .split_whitespace()
                .next()
                .map(|s| s.trim_start_matches(|c: char| !c.is_ascii_digit()))
                .unwrap_or_default();
            return Some(VersionSpec::new(
                VersionSpecKind::Range,
                trimmed,
                first_version,
            ));
        }

        None
    }
}

/// Returns true if the declared value uses a non-semver protocol
pub fn is_non_semver(range: &str) -> bool {
    NON_SEMVER_PREFIXES.iter().any(|p| range.starts_with(p)) || range.contains('/')
}
