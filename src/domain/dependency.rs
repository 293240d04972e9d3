//! Dependency declarations and workspace package structures

use std::fmt;
use std::path::PathBuf;

/// The package.json section a dependency is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencySection {
    /// `dependencies`
    Dependencies,
    /// `devDependencies`
    DevDependencies,
    /// `peerDependencies`
    PeerDependencies,
    /// `optionalDependencies`
    OptionalDependencies,
}

impl DependencySection {
    /// All sections, in the order they are scanned
    pub fn all() -> &'static [DependencySection] {
        &[
            DependencySection::Dependencies,
            DependencySection::DevDependencies,
            DependencySection::PeerDependencies,
            DependencySection::OptionalDependencies,
        ]
    }

    /// The JSON key of this section
    pub fn key(&self) -> &'static str {
        match self {
            DependencySection::Dependencies => "dependencies",
            DependencySection::DevDependencies => "devDependencies",
            DependencySection::PeerDependencies => "peerDependencies",
            DependencySection::OptionalDependencies => "optionalDependencies",
        }
    }
}

impl fmt::Display for DependencySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A single dependency declaration in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Declared range, verbatim
    pub range: String,
    /// Section the declaration lives in
    pub section: DependencySection,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(
        name: impl Into<String>,
        range: impl Into<String>,
        section: DependencySection,
    ) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
            section,
        }
    }

    /// Returns true if this is a development dependency
    pub fn is_dev(&self) -> bool {
        self.section == DependencySection::DevDependencies
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = if self.is_dev() { " (dev)" } else { "" };
        write!(f, "{}@{}{}", self.name, self.range, dev_marker)
    }
}

/// A package discovered in the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePackage {
    /// Path to the package.json
    pub path: PathBuf,
    /// Package name from the manifest
    pub name: String,
    /// Declarations in section order, then file order
    pub dependencies: Vec<Dependency>,
}

impl WorkspacePackage {
    /// Creates a new workspace package
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Adds a declaration (builder pattern)
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// Strips an npm `@scope/` prefix from a package name
pub fn short_name(name: &str) -> &str {
    if name.starts_with('@') {
        if let Some((_, rest)) = name.split_once('/') {
            return rest;
        }
    }
    name
}
