//! Workspace discovery
//!
//! This module provides:
//! - The `WorkspaceScanner` trait the orchestrator discovers packages through
//! - `FsWorkspaceScanner`, which follows yarn/lerna workspace globs on disk

mod detector;

pub use detector::FsWorkspaceScanner;

use crate::domain::WorkspacePackage;
use crate::error::DiscoveryError;
use std::path::Path;

/// Trait for discovering the packages of a monorepo
pub trait WorkspaceScanner: Send + Sync {
    /// Discover packages under `root`, the root package first
    fn discover(&self, root: &Path) -> Result<Vec<WorkspacePackage>, DiscoveryError>;
}
