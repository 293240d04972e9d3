//! Filesystem workspace detection
//!
//! Features:
//! - Reads `workspaces` from the root package.json (array or `{ packages }` form)
//! - Falls back to `packages` in lerna.json
//! - Expands globs relative to the root, sorted, `!pattern` entries exclude
//! - Directories without a package.json are skipped
//! - Anything under `node_modules` is never a workspace package

use super::WorkspaceScanner;
use crate::domain::WorkspacePackage;
use crate::error::{DiscoveryError, ManifestError};
use crate::manifest::{PackageJson, MANIFEST_FILENAME};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Lerna configuration, only the fields needed here
#[derive(Debug, Default, Deserialize)]
struct LernaConfig {
    #[serde(default)]
    packages: Vec<String>,
}

/// Scanner reading manifests from disk
#[derive(Debug, Default, Clone)]
pub struct FsWorkspaceScanner;

impl FsWorkspaceScanner {
    /// Create a new scanner
    pub fn new() -> Self {
        Self
    }

    fn workspace_patterns(
        &self,
        root: &Path,
        manifest: &PackageJson,
    ) -> Result<Vec<String>, DiscoveryError> {
        let patterns = manifest.workspace_patterns();
        if !patterns.is_empty() {
            return Ok(patterns);
        }

        let lerna_path = root.join("lerna.json");
        if !lerna_path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&lerna_path)
            .map_err(|e| ManifestError::read_error(&lerna_path, e))?;
        let lerna: LernaConfig = serde_json::from_str(&content)
            .map_err(|e| ManifestError::json_parse_error(&lerna_path, e.to_string()))?;
        Ok(lerna.packages)
    }

    fn package_dirs(&self, root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, DiscoveryError> {
        let (excludes, includes): (Vec<&String>, Vec<&String>) =
            patterns.iter().partition(|p| p.starts_with('!'));
        let excludes = excludes
            .iter()
            .map(|p| compile(p.trim_start_matches('!')))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        let mut dirs = Vec::new();

        for pattern in includes {
            let full_pattern = root.join(pattern.trim_end_matches('/'));
            let pattern_str = full_pattern.to_string_lossy();
            let entries = glob::glob(&pattern_str).map_err(|e| DiscoveryError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.msg.to_string(),
            })?;

            let mut matched: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
            matched.sort();

            for path in matched {
                if !path.is_dir() || !seen.insert(path.clone()) {
                    continue;
                }
                let relative = path.strip_prefix(root).unwrap_or(&path);
                if is_installed(relative) {
                    continue;
                }
                if excludes.iter().any(|p| p.matches_path(relative)) {
                    debug!("Excluding workspace directory {}", relative.display());
                    continue;
                }
                dirs.push(path);
            }
        }

        Ok(dirs)
    }
}

fn is_installed(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| c == Component::Normal("node_modules".as_ref()))
}

fn compile(pattern: &str) -> Result<glob::Pattern, DiscoveryError> {
    glob::Pattern::new(pattern).map_err(|e| DiscoveryError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })
}

/// Build a workspace package; a manifest without `name` is named after its directory
fn to_package(manifest: &PackageJson) -> WorkspacePackage {
    let name = manifest
        .name()
        .map(str::to_string)
        .or_else(|| {
            manifest
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    manifest
        .dependencies()
        .into_iter()
        .fold(WorkspacePackage::new(manifest.path(), name), |package, dep| {
            package.with_dependency(dep)
        })
}

impl WorkspaceScanner for FsWorkspaceScanner {
    fn discover(&self, root: &Path) -> Result<Vec<WorkspacePackage>, DiscoveryError> {
        if !root.is_dir() {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        let root_manifest = PackageJson::load(&root.join(MANIFEST_FILENAME))?;
        let patterns = self.workspace_patterns(root, &root_manifest)?;
        debug!("Workspace patterns: {:?}", patterns);

        let mut packages = vec![to_package(&root_manifest)];
        for dir in self.package_dirs(root, &patterns)? {
            let manifest_path = dir.join(MANIFEST_FILENAME);
            if !manifest_path.exists() {
                debug!("Skipping {}: no {}", dir.display(), MANIFEST_FILENAME);
                continue;
            }
            let manifest = PackageJson::load(&manifest_path)?;
            packages.push(to_package(&manifest));
        }

        debug!("Discovered {} workspace packages", packages.len());
        Ok(packages)
    }
}
