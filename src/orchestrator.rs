//! Bump orchestrator for coordinating the entire workflow
//!
//! This module provides:
//! - Workflow coordination: scan → index → load lockfile → reconcile → apply
//! - `BumpConfig`, the library-side configuration built from CLI arguments
//! - Injection of the scanner, registry, process runner and reporter
//!
//! The lockfile is loaded before the first registry query, so a malformed
//! lockfile fails the run without touching the network.

use crate::apply::{ApplyOutcome, PatchApplier};
use crate::cli::CliArgs;
use crate::domain::{DependencyIndex, ReconcilePlan};
use crate::error::{AppError, ConfigError};
use crate::lockfile::Lockfile;
use crate::process::{ProcessRunner, SystemProcessRunner};
use crate::reconcile::{Reconciler, TrackFilter, DEFAULT_PATTERN};
use crate::registry::{create_registry, RegistryClient, RegistryKind, NPM_REGISTRY_URL};
use crate::report::{ConsoleReporter, Reporter};
use crate::workspace::{FsWorkspaceScanner, WorkspaceScanner};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default deadline for each registry query
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for one bump run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpConfig {
    /// Workspace root
    pub root: PathBuf,
    /// Globs of tracked package names
    pub patterns: Vec<String>,
    /// Tracked names to leave alone
    pub exclude: Vec<String>,
    /// Registry client to use
    pub registry: RegistryKind,
    /// Base URL for the npm registry client
    pub registry_url: String,
    /// Command used for the reinstall
    pub package_manager: String,
    /// Lockfile path, relative to the root unless absolute
    pub lockfile: PathBuf,
    /// Deadline for each registry query
    pub timeout: Option<Duration>,
    /// Deadline for the reinstall
    pub install_timeout: Option<Duration>,
    /// Compute and log only
    pub dry_run: bool,
    /// Run the reinstall after writing
    pub install: bool,
    /// Suppress console output
    pub quiet: bool,
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            patterns: vec![DEFAULT_PATTERN.to_string()],
            exclude: Vec::new(),
            registry: RegistryKind::Yarn,
            registry_url: NPM_REGISTRY_URL.to_string(),
            package_manager: "yarn".to_string(),
            lockfile: PathBuf::from("yarn.lock"),
            timeout: Some(DEFAULT_TIMEOUT),
            install_timeout: None,
            dry_run: false,
            install: true,
            quiet: false,
        }
    }
}

impl BumpConfig {
    /// Create a configuration for the given root with default settings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Build the configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            root: args.path.clone(),
            patterns: args.patterns.clone(),
            exclude: args.exclude.clone(),
            registry: args.registry,
            registry_url: args.registry_url.clone(),
            package_manager: args.package_manager.clone(),
            lockfile: args.lockfile.clone(),
            timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
            install_timeout: (args.install_timeout > 0)
                .then(|| Duration::from_secs(args.install_timeout)),
            dry_run: args.dry_run,
            install: !args.skip_install,
            quiet: args.quiet,
        }
    }

    /// Set the tracked name patterns
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
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

    /// Absolute or root-relative lockfile path
    pub fn lockfile_path(&self) -> PathBuf {
        self.root.join(&self.lockfile)
    }

    /// Compile the tracked-package filter
    pub fn build_filter(&self) -> Result<TrackFilter, ConfigError> {
        Ok(TrackFilter::new(&self.patterns)?.with_exclude(self.exclude.clone()))
    }
}

/// Result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// What the reconciler decided
    pub plan: ReconcilePlan,
    /// What the applier did with it
    pub applied: ApplyOutcome,
    /// Whether the run was a dry run
    pub dry_run: bool,
}

impl RunOutcome {
    /// One-line summary of the run
    pub fn summary(&self) -> String {
        if self.plan.is_empty() {
            return "All tracked packages are up to date".to_string();
        }

        let manifests = self.plan.patched_manifests().len();
        let entries = self.plan.lock_removals.len();
        let line = format!(
            "{} {} updated, {} lockfile {} removed",
            manifests,
            if manifests == 1 { "manifest" } else { "manifests" },
            entries,
            if entries == 1 { "entry" } else { "entries" }
        );

        if self.dry_run {
            format!("Dry run: {}", line)
        } else {
            line
        }
    }
}

/// Orchestrator for coordinating the bump workflow
pub struct Orchestrator {
    config: BumpConfig,
    scanner: Box<dyn WorkspaceScanner>,
    registry: Box<dyn RegistryClient>,
    runner: Arc<dyn ProcessRunner>,
    reporter: Arc<dyn Reporter>,
}

impl Orchestrator {
    /// Create an orchestrator talking to the real filesystem, registry and package manager
    pub fn new(config: BumpConfig) -> Result<Self, AppError> {
        // The reconciler bounds queries, the runner deadline bounds the reinstall
        let query_runner: Arc<dyn ProcessRunner> = Arc::new(SystemProcessRunner::new(&config.root));
        let runner: Arc<dyn ProcessRunner> = Arc::new(
            SystemProcessRunner::new(&config.root)
                .with_progress(!config.quiet)
                .with_timeout(config.install_timeout),
        );
        let registry = create_registry(
            config.registry,
            &config.registry_url,
            query_runner,
            config.timeout,
        )?;
        let reporter = Arc::new(ConsoleReporter::new(config.quiet));

        Ok(Self::with_collaborators(
            config,
            Box::new(FsWorkspaceScanner::new()),
            registry,
            runner,
            reporter,
        ))
    }

    /// Create an orchestrator with custom collaborators (for testing)
    pub fn with_collaborators(
        config: BumpConfig,
        scanner: Box<dyn WorkspaceScanner>,
        registry: Box<dyn RegistryClient>,
        runner: Arc<dyn ProcessRunner>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            config,
            scanner,
            registry,
            runner,
            reporter,
        }
    }

    /// Run the bump workflow
    pub async fn run(&self) -> Result<RunOutcome, AppError> {
        let filter = self.config.build_filter()?;

        // Step 1: Discover workspace packages
        let packages = self.scanner.discover(&self.config.root)?;
        let index = DependencyIndex::build(&packages, |name| filter.is_tracked(name));
        debug!(
            "Tracking {} declared packages across {} manifests",
            index.names().len(),
            packages.len()
        );

        // Step 2: Load the lockfile before any query
        let lockfile_path = self.config.lockfile_path();
        let mut lockfile = Lockfile::load(&lockfile_path)?;
        debug!("Loaded {} lockfile blocks", lockfile.len());

        // Step 3: Query the registry and decide
        let reconciler = Reconciler::new(filter, self.reporter.clone())
            .with_query_timeout(self.config.timeout);
        let plan = reconciler
            .reconcile(&index, &lockfile, self.registry.as_ref())
            .await?;

        // Step 4: Apply
        let applier = PatchApplier::new(self.runner.clone(), self.reporter.clone())
            .with_package_manager(self.config.package_manager.clone())
            .with_dry_run(self.config.dry_run)
            .with_install(self.config.install);
        let applied = applier.apply(&plan, &mut lockfile, &lockfile_path).await?;
        info!(
            "Removed {} lockfile entries, updated {} manifests",
            applied.removed_entries,
            applied.updated_manifests.len()
        );

        Ok(RunOutcome {
            plan,
            applied,
            dry_run: self.config.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencySection, LockRemoval, ManifestPatch};
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = BumpConfig::default();
        assert_eq!(config.patterns, vec!["@backstage/*"]);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
        assert_eq!(config.install_timeout, None);
        assert!(config.install);
        assert!(!config.dry_run);
        assert_eq!(config.lockfile_path(), PathBuf::from("./yarn.lock"));
    }

    #[test]
    fn test_from_cli() {
        let args = CliArgs::parse_from([
            "lockbump",
            "/repo",
            "--pattern",
            "@roadiehq/*",
            "--exclude",
            "@roadiehq/legacy",
            "--timeout",
            "0",
            "--skip-install",
            "-q",
        ]);
        let config = BumpConfig::from_cli(&args);

        assert_eq!(config.root, PathBuf::from("/repo"));
        assert_eq!(config.patterns, vec!["@roadiehq/*"]);
        assert_eq!(config.exclude, vec!["@roadiehq/legacy"]);
        assert_eq!(config.timeout, None);
        assert_eq!(config.install_timeout, None);
        assert!(!config.install);
        assert!(config.quiet);
        assert_eq!(config.lockfile_path(), PathBuf::from("/repo/yarn.lock"));
    }

    #[test]
    fn test_from_cli_install_timeout() {
        let args = CliArgs::parse_from(["lockbump", "--install-timeout", "600"]);
        let config = BumpConfig::from_cli(&args);
        assert_eq!(config.install_timeout, Some(Duration::from_secs(600)));
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_absolute_lockfile_path() {
        let config = BumpConfig {
            lockfile: PathBuf::from("/elsewhere/yarn.lock"),
            ..BumpConfig::new("/repo")
        };
        assert_eq!(config.lockfile_path(), PathBuf::from("/elsewhere/yarn.lock"));
    }

    #[test]
    fn test_build_filter() {
        let config = BumpConfig::new("/repo");
        let filter = config.build_filter().unwrap();
        assert!(filter.is_tracked("@backstage/core"));

        let config = BumpConfig::new("/repo").with_patterns(vec!["[".to_string()]);
        assert!(config.build_filter().is_err());
    }

    #[test]
    fn test_summary_up_to_date() {
        assert_eq!(
            RunOutcome::default().summary(),
            "All tracked packages are up to date"
        );
    }

    #[test]
    fn test_summary_counts() {
        let removal = LockRemoval {
            name: "@backstage/core".to_string(),
            range: "^1.0.3".to_string(),
            current_version: "1.0.3".to_string(),
            target_version: "1.0.6".to_string(),
        };
        let outcome = RunOutcome {
            plan: ReconcilePlan {
                lock_removals: vec![removal.clone(), removal.clone(), removal],
                manifest_patches: vec![ManifestPatch {
                    manifest_path: PathBuf::from("/repo/packages/b/package.json"),
                    manifest_name: "b".to_string(),
                    section: DependencySection::Dependencies,
                    name: "@backstage/theme".to_string(),
                    old_range: "^1.0.0".to_string(),
                    new_range: "^2.0.0".to_string(),
                }],
                log_lines: Vec::new(),
            },
            ..Default::default()
        };
        assert_eq!(
            outcome.summary(),
            "1 manifest updated, 3 lockfile entries removed"
        );

        let dry = RunOutcome {
            dry_run: true,
            ..outcome
        };
        assert!(dry.summary().starts_with("Dry run: "));
    }
}
