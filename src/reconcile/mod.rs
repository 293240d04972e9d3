//! Version reconciliation
//!
//! This module provides:
//! - The tracked-package filter
//! - The reconciler that queries the registry for every tracked package and
//!   decides which lockfile entries to drop and which manifest ranges to bump
//!
//! Nothing here touches the disk; the result is a `ReconcilePlan`.

mod filter;

pub use filter::{TrackFilter, DEFAULT_PATTERN};

use crate::domain::{
    short_name, Declaration, DependencyIndex, LockRemoval, ManifestPatch, ReconcilePlan,
    VersionSpecKind,
};
use crate::error::RegistryError;
use crate::lockfile::Lockfile;
use crate::parser::{bump_range, floor_version, parse_spec, satisfies};
use crate::registry::RegistryClient;
use crate::report::{Reporter, OUTDATED_BANNER};
use semver::Version;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Decides removals and patches from registry versions
pub struct Reconciler {
    /// Which names belong to the tracked family
    filter: TrackFilter,
    /// Sink for the contract log lines
    reporter: Arc<dyn Reporter>,
    /// Deadline for each registry query
    query_timeout: Option<Duration>,
}

impl Reconciler {
    /// Create a reconciler without a query deadline
    pub fn new(filter: TrackFilter, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            filter,
            reporter,
            query_timeout: None,
        }
    }

    /// Set the deadline for each registry query
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Names to query, in order: declared names first, then tracked names
    /// only present in the lockfile
    pub fn tracked_names(&self, index: &DependencyIndex, lockfile: &Lockfile) -> Vec<String> {
        let mut names: Vec<String> = index.names().to_vec();
        for name in lockfile.names() {
            if self.filter.is_tracked(name) && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Query every tracked package and compute the plan
    pub async fn reconcile(
        &self,
        index: &DependencyIndex,
        lockfile: &Lockfile,
        registry: &dyn RegistryClient,
    ) -> Result<ReconcilePlan, RegistryError> {
        let mut plan = ReconcilePlan::default();
        let mut latest: Vec<(String, Version)> = Vec::new();

        for name in self.tracked_names(index, lockfile) {
            self.emit(&mut plan, format!("Checking for updates of {}", name));
            match self.query(registry, &name).await {
                Ok(version) => {
                    debug!("Latest version of {} is {}", name, version);
                    latest.push((name, version));
                }
                Err(e) if e.is_not_found() && !index.contains(&name) => {
                    self.emit(
                        &mut plan,
                        format!("Package info not found, ignoring package {}", name),
                    );
                }
                Err(e) => return Err(e),
            }
        }

        for (name, target) in &latest {
            plan.lock_removals.extend(stale_entries(lockfile, name, target));
        }
        for declaration in index.declarations() {
            let Some((_, target)) = latest.iter().find(|(n, _)| *n == declaration.name) else {
                continue;
            };
            if let Some(patch) = patch_for(declaration, target) {
                plan.manifest_patches.push(patch);
            }
        }

        if plan.is_empty() {
            debug!("All tracked packages are up to date");
            return Ok(plan);
        }

        self.emit(&mut plan, OUTDATED_BANNER.to_string());
        let lines: Vec<String> = plan
            .lock_removals
            .iter()
            .map(|r| r.to_string())
            .chain(plan.manifest_patches.iter().map(|p| p.to_string()))
            .collect();
        for line in lines {
            self.emit(&mut plan, line);
        }

        Ok(plan)
    }

    fn emit(&self, plan: &mut ReconcilePlan, line: String) {
        self.reporter.line(&line);
        plan.log_lines.push(line);
    }

    async fn query(
        &self,
        registry: &dyn RegistryClient,
        name: &str,
    ) -> Result<Version, RegistryError> {
        let fetch = registry.fetch_latest(name);
        let latest = match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| RegistryError::timeout(name, registry.registry_name()))??,
            None => fetch.await?,
        };

        Version::parse(latest.trim()).map_err(|e| {
            RegistryError::invalid_response(
                name,
                registry.registry_name(),
                format!("invalid version '{}': {}", latest, e),
            )
        })
    }
}

/// Lockfile specifiers of `name` resolved older than `target` whose range admits it
fn stale_entries(lockfile: &Lockfile, name: &str, target: &Version) -> Vec<LockRemoval> {
    let mut removals = Vec::new();

    for (range, entry) in lockfile.get(name) {
        let Some(current) = entry.version() else {
            debug!("Lockfile entry {}@{} has no version", name, range);
            continue;
        };
        let Ok(current_version) = Version::parse(current) else {
            debug!("Lockfile entry {}@{} has non-semver version {}", name, range, current);
            continue;
        };
        if current_version >= *target {
            continue;
        }

        match satisfies(range, target) {
            Some(true) => removals.push(LockRemoval {
                name: name.to_string(),
                range: range.to_string(),
                current_version: current.to_string(),
                target_version: target.to_string(),
            }),
            Some(false) => {}
            None => debug!("Skipping {}@{}: not a semver range", name, range),
        }
    }

    removals
}

/// The patch for a declaration whose range excludes `target`
fn patch_for(declaration: &Declaration, target: &Version) -> Option<ManifestPatch> {
    let range = declaration.range.as_str();
    match satisfies(range, target) {
        Some(true) => return None,
        Some(false) => {}
        None => {
            debug!(
                "Skipping {}@{} in {}: not a semver range",
                declaration.name, range, declaration.manifest_name
            );
            return None;
        }
    }

    // Never bump a range downwards
    if let Some(spec) = parse_spec(range) {
        let lower_bound = !matches!(
            spec.kind,
            VersionSpecKind::Less | VersionSpecKind::LessOrEqual
        );
        if lower_bound && floor_version(&spec.version).is_some_and(|floor| floor > *target) {
            debug!(
                "Keeping {}@{} in {}: ahead of latest {}",
                declaration.name, range, declaration.manifest_name, target
            );
            return None;
        }
    }

    let new_range = bump_range(range, &target.to_string())?;
    Some(ManifestPatch {
        manifest_path: declaration.manifest_path.clone(),
        manifest_name: short_name(&declaration.manifest_name).to_string(),
        section: declaration.section,
        name: declaration.name.clone(),
        old_range: range.to_string(),
        new_range,
    })
}
