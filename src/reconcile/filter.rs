//! Tracked-package filter
//!
//! Decides which package names belong to the family being reconciled.
//! Names must match one of the glob patterns and must not be excluded.

use crate::error::ConfigError;
use glob::Pattern;

/// Default family of tracked packages
pub const DEFAULT_PATTERN: &str = "@backstage/*";

/// Filter configuration for tracked packages
#[derive(Debug, Clone)]
pub struct TrackFilter {
    /// Name patterns; a name is tracked if any matches
    patterns: Vec<Pattern>,
    /// Names to leave alone even when a pattern matches
    exclude: Vec<String>,
}

impl Default for TrackFilter {
    fn default() -> Self {
        Self {
            patterns: vec![Pattern::new(DEFAULT_PATTERN).expect("default pattern is valid")],
            exclude: Vec::new(),
        }
    }
}

impl TrackFilter {
    /// Create a filter from glob patterns
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    message: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            exclude: Vec::new(),
        })
    }

    /// Set packages to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Check if a package belongs to the tracked family
    pub fn is_tracked(&self, name: &str) -> bool {
        if self.exclude.iter().any(|e| e == name) {
            return false;
        }
        self.patterns.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_tracks_backstage() {
        let filter = TrackFilter::default();
        assert!(filter.is_tracked("@backstage/core"));
        assert!(filter.is_tracked("@backstage/core-api"));
        assert!(!filter.is_tracked("react"));
        assert!(!filter.is_tracked("@material-ui/core"));
    }

    #[test]
    fn test_multiple_patterns() {
        let filter = TrackFilter::new(&["@backstage/*", "lodash*"]).unwrap();
        assert!(filter.is_tracked("lodash"));
        assert!(filter.is_tracked("lodash.merge"));
        assert!(filter.is_tracked("@backstage/theme"));
        assert!(!filter.is_tracked("react"));
    }

    #[test]
    fn test_exact_name_pattern() {
        let filter = TrackFilter::new(&["react"]).unwrap();
        assert!(filter.is_tracked("react"));
        assert!(!filter.is_tracked("react-dom"));
    }

    #[test]
    fn test_with_exclude() {
        let filter = TrackFilter::default().with_exclude(vec!["@backstage/theme".to_string()]);
        assert!(!filter.is_tracked("@backstage/theme"));
        assert!(filter.is_tracked("@backstage/core"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = TrackFilter::new(&["@backstage/[core"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        assert!(err.to_string().contains("@backstage/[core"));
    }

    #[test]
    fn test_empty_patterns_track_nothing() {
        let filter = TrackFilter::new::<&str>(&[]).unwrap();
        assert!(!filter.is_tracked("@backstage/core"));
    }
}
