//! Version range specification as declared in package.json
//!
//! Handles npm range shapes such as `^1.2.3`, `~1.2.3`, `>=1.0.0`, `=1.2.3`
//! and `1.2.3`, remembering the operator so a bump keeps the author's style.

use std::fmt;

/// The kind of version specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSpecKind {
    /// Exact version without operator (e.g., `1.2.3`)
    Exact,
    /// Exact version with explicit operator (e.g., `=1.2.3`)
    Equal,
    /// Caret range (e.g., `^1.2.3`) - compatible with major version
    Caret,
    /// Tilde range (e.g., `~1.2.3`) - compatible with minor version
    Tilde,
    /// Greater than or equal (e.g., `>=1.2.3`)
    GreaterOrEqual,
    /// Greater than (e.g., `>1.2.3`)
    Greater,
    /// Less than or equal (e.g., `<=1.2.3`)
    LessOrEqual,
    /// Less than (e.g., `<1.2.3`)
    Less,
    /// Wildcard (e.g., `1.2.*`, `*`)
    Wildcard,
    /// Complex range (e.g., `>=1.0.0 <2.0.0`, `^1.0.0 || ^2.0.0`)
    Range,
}

/// A version specification with its original string representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    /// The kind of version specification
    pub kind: VersionSpecKind,
    /// The raw range string as it appears in the manifest
    pub raw: String,
    /// The extracted version number (without prefix)
    pub version: String,
    /// Operator prefix to preserve during bumps (e.g., `^`, `~`, `>=`)
    pub prefix: Option<String>,
}

impl VersionSpec {
    /// Creates a new VersionSpec
    pub fn new(kind: VersionSpecKind, raw: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            version: version.into(),
            prefix: None,
        }
    }

    /// Creates a new VersionSpec with prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Formats a new version while preserving the original operator
    pub fn format_updated(&self, new_version: &str) -> String {
        let mut result = String::new();

        if let Some(ref prefix) = self.prefix {
            result.push_str(prefix);
        }

        result.push_str(new_version);
        result
    }

    /// Builds the range that replaces this one so that it admits `new_version`
    ///
    /// Operators that would still exclude the new version after substitution
    /// (`<`, `>`) and shapes with no single operator fall back to a caret range.
    pub fn bumped(&self, new_version: &str) -> String {
        match self.kind {
            VersionSpecKind::Exact
            | VersionSpecKind::Equal
            | VersionSpecKind::Caret
            | VersionSpecKind::Tilde
            | VersionSpecKind::GreaterOrEqual
            | VersionSpecKind::LessOrEqual => self.format_updated(new_version),
            VersionSpecKind::Greater => format!(">={}", new_version),
            VersionSpecKind::Less | VersionSpecKind::Wildcard | VersionSpecKind::Range => {
                format!("^{}", new_version)
            }
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
