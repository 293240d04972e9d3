//! lockbump - Monorepo dependency version bumper library
//!
//! This library provides the core functionality for bumping a family of npm
//! packages across a yarn workspace:
//! - Workspace discovery and package.json editing
//! - A yarn.lock v1 model that round-trips byte for byte
//! - Registry lookups of the `latest` dist-tag
//! - Reconciliation of lockfile entries and manifest ranges
//! - Writing the result and reinstalling

pub mod apply;
pub mod cli;
pub mod domain;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod orchestrator;
pub mod parser;
pub mod process;
pub mod progress;
pub mod reconcile;
pub mod registry;
pub mod report;
pub mod workspace;
