//! Reconciliation decisions
//!
//! Provides the removal and patch records computed in memory before anything
//! is written to disk.

use super::DependencySection;
use std::fmt;
use std::path::{Path, PathBuf};

/// A lockfile specifier that must go so the package manager re-resolves it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRemoval {
    /// Package name
    pub name: String,
    /// Range from the lockfile block header
    pub range: String,
    /// Version currently resolved for that range
    pub current_version: String,
    /// Latest published version
    pub target_version: String,
}

impl fmt::Display for LockRemoval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Removing lockfile entry for {}@{} to bump to {}",
            self.name, self.range, self.target_version
        )
    }
}

/// A manifest range that no longer admits the latest version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPatch {
    /// Path to the package.json
    pub manifest_path: PathBuf,
    /// Short name of the owning package
    pub manifest_name: String,
    /// Section the declaration was found in
    pub section: DependencySection,
    /// Dependency name
    pub name: String,
    /// Range before the bump
    pub old_range: String,
    /// Range after the bump
    pub new_range: String,
}

impl fmt::Display for ManifestPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bumping {} in {} to {}",
            self.name, self.manifest_name, self.new_range
        )
    }
}

/// Full decision set of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Lockfile specifiers to remove, in query order
    pub lock_removals: Vec<LockRemoval>,
    /// Manifest ranges to rewrite, in discovery order
    pub manifest_patches: Vec<ManifestPatch>,
    /// Every log line emitted while reconciling, in order
    pub log_lines: Vec<String>,
}

impl ReconcilePlan {
    /// Returns true if nothing needs to change
    pub fn is_empty(&self) -> bool {
        self.lock_removals.is_empty() && self.manifest_patches.is_empty()
    }

    /// Distinct manifests touched by the patches, in first-seen order
    pub fn patched_manifests(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = Vec::new();
        for patch in &self.manifest_patches {
            if !paths.contains(&patch.manifest_path.as_path()) {
                paths.push(&patch.manifest_path);
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(path: &str, name: &str) -> ManifestPatch {
        ManifestPatch {
            manifest_path: PathBuf::from(path),
            manifest_name: "b".to_string(),
            section: DependencySection::Dependencies,
            name: name.to_string(),
            old_range: "^1.0.0".to_string(),
            new_range: "^2.0.0".to_string(),
        }
    }

    #[test]
    fn test_removal_log_line() {
        let removal = LockRemoval {
            name: "@backstage/core".to_string(),
            range: "^1.0.3".to_string(),
            current_version: "1.0.3".to_string(),
            target_version: "1.0.6".to_string(),
        };
        assert_eq!(
            removal.to_string(),
            "Removing lockfile entry for @backstage/core@^1.0.3 to bump to 1.0.6"
        );
    }

    #[test]
    fn test_patch_log_line() {
        assert_eq!(
            patch("/b/package.json", "@backstage/theme").to_string(),
            "Bumping @backstage/theme in b to ^2.0.0"
        );
    }

    #[test]
    fn test_empty_plan() {
        let plan = ReconcilePlan::default();
        assert!(plan.is_empty());
        assert!(plan.patched_manifests().is_empty());
    }

    #[test]
    fn test_patched_manifests_are_distinct() {
        let plan = ReconcilePlan {
            manifest_patches: vec![
                patch("/b/package.json", "@backstage/theme"),
                patch("/c/package.json", "@backstage/theme"),
                patch("/b/package.json", "@backstage/core"),
            ],
            ..Default::default()
        };
        assert!(!plan.is_empty());
        assert_eq!(
            plan.patched_manifests(),
            vec![Path::new("/b/package.json"), Path::new("/c/package.json")]
        );
    }
}
