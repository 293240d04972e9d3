//! npm range satisfaction on top of the semver crate
//!
//! npm and Cargo agree on caret, tilde and partial-version semantics, so an
//! npm range can be rewritten into one `semver::VersionReq` per `||`
//! alternative. The differences handled here:
//! - a bare version means exact in npm (`1.2.3` → `=1.2.3`)
//! - comparators are separated by whitespace instead of commas
//! - hyphen ranges (`1.0.0 - 2.0.0` → `>=1.0.0, <=2.0.0`)
//! - `x`/`*` wildcard components and a leading `v`

use super::node::is_non_semver;
use semver::{Version, VersionReq};

/// A parsed npm range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRange {
    alternatives: Vec<VersionReq>,
}

impl NodeRange {
    /// Parse an npm range; `None` if it is not a semver range
    pub fn parse(range: &str) -> Option<Self> {
        let trimmed = range.trim();
        if is_non_semver(trimmed) {
            return None;
        }

        let alternatives = trimmed
            .split("||")
            .map(|set| parse_comparator_set(set.trim()))
            .collect::<Option<Vec<_>>>()?;

        Some(Self { alternatives })
    }

    /// Returns true if any alternative admits the version
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

/// Returns whether `version` satisfies `range`; `None` if the range is not semver
pub fn satisfies(range: &str, version: &Version) -> Option<bool> {
    NodeRange::parse(range).map(|r| r.matches(version))
}

/// Lowest version a possibly partial version admits (`2` → `2.0.0`, `1.2.x` → `1.2.0`)
pub fn floor_version(version: &str) -> Option<Version> {
    let normalized = strip_wildcards(version.trim())??;
    let parts = normalized.split(['-', '+']).next()?.split('.').count();
    let padded = format!("{}{}", normalized, ".0".repeat(3usize.saturating_sub(parts)));
    Version::parse(&padded).ok()
}

fn parse_comparator_set(set: &str) -> Option<VersionReq> {
    let mut comparators = Vec::new();

    if let Some((low, high)) = set.split_once(" - ") {
        if let Some(low) = strip_wildcards(low.trim())? {
            comparators.push(format!(">={}", low));
        }
        if let Some(high) = strip_wildcards(high.trim())? {
            comparators.push(format!("<={}", high));
        }
    } else {
        let mut pending_op = String::new();
        for token in set.split_whitespace() {
            if token.chars().all(is_operator_char) {
                pending_op.push_str(token);
                continue;
            }
            let token = format!("{}{}", pending_op, token);
            pending_op.clear();
            if let Some(comparator) = normalize_comparator(&token)? {
                comparators.push(comparator);
            }
        }
        if !pending_op.is_empty() {
            return None;
        }
    }

    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }
    VersionReq::parse(&comparators.join(", ")).ok()
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '^' | '~')
}

/// `Some(None)` for a comparator that admits every version
fn normalize_comparator(token: &str) -> Option<Option<String>> {
    let op_len = token
        .find(|c: char| !is_operator_char(c))
        .unwrap_or(token.len());
    let (op, rest) = token.split_at(op_len);

    let op = match op {
        "" | "=" => "=",
        "~>" => "~",
        "^" | "~" | ">" | ">=" | "<" | "<=" => op,
        _ => return None,
    };

    let version = strip_wildcards(rest)?;
    Some(version.map(|v| format!("{}{}", op, v)))
}

/// Drops `x`/`*` components, `None` if the version is malformed and
/// `Some(None)` if nothing but wildcards remain
fn strip_wildcards(version: &str) -> Option<Option<String>> {
    let version = version.strip_prefix(['v', 'V']).unwrap_or(version);
    if version.is_empty() {
        return Some(None);
    }

    let (core, suffix) = match version.find(['-', '+']) {
        Some(pos) => version.split_at(pos),
        None => (version, ""),
    };

    let mut parts = Vec::new();
    let mut truncated = false;
    for part in core.split('.') {
        if matches!(part, "x" | "X" | "*") {
            truncated = true;
            break;
        }
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        parts.push(part);
    }

    if parts.len() > 3 {
        return None;
    }
    if parts.is_empty() {
        return Some(None);
    }

    let mut normalized = parts.join(".");
    if !truncated && parts.len() == 3 {
        normalized.push_str(suffix);
    }
    Some(Some(normalized))
}
