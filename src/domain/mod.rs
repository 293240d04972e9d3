//! Core domain models for lockbump
//!
//! This module contains the fundamental types used throughout the application:
//! - Version specification types for parsing and bumping npm ranges
//! - Dependency declarations and workspace packages
//! - The dependency index of tracked packages
//! - Reconciliation decisions (lockfile removals and manifest patches)

mod dependency;
mod index;
mod plan;
mod version_spec;

pub use dependency::{short_name, Dependency, DependencySection, WorkspacePackage};
pub use index::{Declaration, DependencyIndex};
pub use plan::{LockRemoval, ManifestPatch, ReconcilePlan};
pub use version_spec::{VersionSpec, VersionSpecKind};
