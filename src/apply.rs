//! Patch application
//!
//! Turns a `ReconcilePlan` into disk changes:
//! - lockfile specifiers are removed and the lockfile re-rendered
//! - manifest ranges are replaced in the section they were found in
//! - the package manager reinstalls so the lockfile is re-resolved
//!
//! Every output is rendered before the first write.

use crate::domain::ReconcilePlan;
use crate::error::{AppError, WriteError};
use crate::lockfile::Lockfile;
use crate::manifest::{write_atomic, PackageJson};
use crate::process::{command_line, ProcessRunner};
use crate::report::Reporter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What `PatchApplier::apply` did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Lockfile specifiers removed
    pub removed_entries: usize,
    /// Manifests with bumped ranges, in discovery order
    pub updated_manifests: Vec<PathBuf>,
    /// Whether anything was written to disk
    pub written: bool,
    /// Whether the reinstall ran
    pub installed: bool,
}

/// Applies reconciliation plans
pub struct PatchApplier {
    runner: Arc<dyn ProcessRunner>,
    reporter: Arc<dyn Reporter>,
    /// Command used for `<pm> install`
    package_manager: String,
    /// Compute everything but write nothing
    dry_run: bool,
    /// Run the reinstall after writing
    install: bool,
}

impl PatchApplier {
    /// Create an applier that writes and reinstalls with yarn
    pub fn new(runner: Arc<dyn ProcessRunner>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            runner,
            reporter,
            package_manager: "yarn".to_string(),
            dry_run: false,
            install: true,
        }
    }

    /// Set the package manager command
    pub fn with_package_manager(mut self, package_manager: impl Into<String>) -> Self {
        self.package_manager = package_manager.into();
        self
    }

    /// Enable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable the reinstall
    pub fn with_install(mut self, install: bool) -> Self {
        self.install = install;
        self
    }

    /// Apply the plan to the lockfile and the manifests it names
    pub async fn apply(
        &self,
        plan: &ReconcilePlan,
        lockfile: &mut Lockfile,
        lockfile_path: &Path,
    ) -> Result<ApplyOutcome, AppError> {
        if plan.is_empty() {
            return Ok(ApplyOutcome::default());
        }

        let mut outcome = ApplyOutcome::default();
        for removal in &plan.lock_removals {
            if lockfile.remove(&removal.name, &removal.range) {
                outcome.removed_entries += 1;
            } else {
                debug!("{}@{} already gone from lockfile", removal.name, removal.range);
            }
        }

        let manifests = self.render_manifests(plan)?;
        outcome.updated_manifests = manifests.iter().map(|(path, _)| path.clone()).collect();

        if self.dry_run {
            info!("Dry run, leaving {} untouched", lockfile_path.display());
            return Ok(outcome);
        }

        lockfile.save(lockfile_path)?;
        for (path, text) in &manifests {
            write_atomic(path, text).map_err(|e| WriteError::manifest(path, e))?;
            debug!("Wrote {}", path.display());
        }
        outcome.written = true;

        if self.install {
            let args = ["install"];
            self.reporter.line(&format!(
                "Running '{}' to install new versions",
                command_line(&self.package_manager, &args)
            ));
            self.runner.run(&self.package_manager, &args).await?;
            outcome.installed = true;
        }

        Ok(outcome)
    }

    fn render_manifests(&self, plan: &ReconcilePlan) -> Result<Vec<(PathBuf, String)>, AppError> {
        let mut rendered = Vec::new();

        for path in plan.patched_manifests() {
            let mut manifest = PackageJson::load(path)?;
            for patch in plan
                .manifest_patches
                .iter()
                .filter(|p| p.manifest_path == path)
            {
                if !manifest.set_range(patch.section, &patch.name, &patch.new_range) {
                    warn!(
                        "{} no longer declares {} in {}",
                        path.display(),
                        patch.name,
                        patch.section
                    );
                }
            }
            rendered.push((path.to_path_buf(), manifest.render()?));
        }

        Ok(rendered)
    }
}
