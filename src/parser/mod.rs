//! npm version range parsing
//!
//! - `node`: recognizes the shape of a declared range so a bump can keep its operator
//! - `range`: decides whether a concrete version satisfies a range

mod node;
mod range;

pub use node::{is_non_semver, NodeVersionParser};
pub use range::{floor_version, satisfies, NodeRange};

use crate::domain::VersionSpec;

/// Parse a declared npm range into a specification
pub fn parse_spec(range: &str) -> Option<VersionSpec> {
    NodeVersionParser.parse(range)
}

/// Compute the replacement for `range` so that it admits `new_version`
///
/// Returns `None` for ranges that are not semver ranges.
pub fn bump_range(range: &str, new_version: &str) -> Option<String> {
    NodeRange::parse(range)?;
    parse_spec(range).map(|spec| spec.bumped(new_version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_range_keeps_caret() {
        assert_eq!(bump_range("^1.0.0", "2.0.0").as_deref(), Some("^2.0.0"));
    }

    #[test]
    fn test_bump_range_exact() {
        assert_eq!(bump_range("1.0.0", "1.0.7").as_deref(), Some("1.0.7"));
    }

    #[test]
    fn test_bump_range_compound() {
        assert_eq!(
            bump_range(">=1.0.0 <2.0.0", "2.0.0").as_deref(),
            Some("^2.0.0")
        );
    }

    #[test]
    fn test_bump_range_keeps_operator_on_partials() {
        assert_eq!(bump_range("~1.2", "1.5.0").as_deref(), Some("~1.5.0"));
        assert_eq!(bump_range("^2.0", "3.1.0").as_deref(), Some("^3.1.0"));
        assert_eq!(bump_range(">=2", "3.0.0").as_deref(), Some(">=3.0.0"));
    }

    #[test]
    fn test_bump_range_rejects_non_semver() {
        assert!(bump_range("workspace:^1.0.0", "2.0.0").is_none());
        assert!(bump_range("latest", "2.0.0").is_none());
    }
}
