//! Dependency index built from the discovered workspace packages

use super::{DependencySection, WorkspacePackage};
use std::path::PathBuf;

/// One tracked declaration together with the manifest that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Tracked package name
    pub name: String,
    /// Declared range, verbatim
    pub range: String,
    /// Section the declaration lives in
    pub section: DependencySection,
    /// Path to the owning package.json
    pub manifest_path: PathBuf,
    /// Name of the owning package
    pub manifest_name: String,
}

/// Tracked package name → declarations, in discovery order
///
/// Names keep the order in which they were first seen; declarations keep
/// manifest order, then section order, then key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    names: Vec<String>,
    declarations: Vec<Declaration>,
}

impl DependencyIndex {
    /// Build the index from packages, keeping only names accepted by `is_tracked`
    pub fn build(packages: &[WorkspacePackage], is_tracked: impl Fn(&str) -> bool) -> Self {
        let mut index = Self::default();

        for package in packages {
            for dep in &package.dependencies {
                if !is_tracked(&dep.name) {
                    continue;
                }
                if !index.contains(&dep.name) {
                    index.names.push(dep.name.clone());
                }
                index.declarations.push(Declaration {
                    name: dep.name.clone(),
                    range: dep.range.clone(),
                    section: dep.section,
                    manifest_path: package.path.clone(),
                    manifest_name: package.name.clone(),
                });
            }
        }

        index
    }

    /// Distinct tracked names in first-seen order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if the name is declared by any manifest
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// All declarations in discovery order
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Returns true if no tracked package is declared
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
