//! CLI argument parsing module for lockbump

use crate::reconcile::DEFAULT_PATTERN;
use crate::registry::{RegistryKind, NPM_REGISTRY_URL};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Monorepo dependency version bumper for yarn workspaces
#[derive(Parser, Debug, Clone)]
#[command(
    name = "lockbump",
    version,
    about = "Bump a family of npm packages across a yarn workspace"
)]
pub struct CliArgs {
    /// Workspace root (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Package selection
    /// Glob of package names to track (can be specified multiple times)
    #[arg(long = "pattern", value_name = "GLOB", action = ArgAction::Append, default_value = DEFAULT_PATTERN)]
    pub patterns: Vec<String>,

    /// Exclude specific packages (can be specified multiple times)
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    // Registry
    /// Where to look up the latest versions
    #[arg(long, value_enum, default_value_t = RegistryKind::Yarn)]
    pub registry: RegistryKind,

    /// Base URL of the npm registry (with --registry npm)
    #[arg(long, value_name = "URL", default_value = NPM_REGISTRY_URL)]
    pub registry_url: String,

    /// Seconds to wait for each registry query, 0 waits forever
    #[arg(long, value_name = "SECS", default_value_t = 120)]
    pub timeout: u64,

    // Package manager
    /// Command used to reinstall after bumping
    #[arg(long, value_name = "CMD", default_value = "yarn")]
    pub package_manager: String,

    /// Seconds to wait for the reinstall, 0 waits forever
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub install_timeout: u64,

    /// Lockfile path, relative to the workspace root
    #[arg(long, value_name = "FILE", default_value = "yarn.lock")]
    pub lockfile: PathBuf,

    // General options
    /// Dry run mode - show what would be bumped without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write the changes but do not run the reinstall
    #[arg(long)]
    pub skip_install: bool,

    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Parse arguments from the process command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
