//! Registry clients for fetching the latest published version of a package
//!
//! This module provides:
//! - HTTP client shared foundation
//! - npm Registry client (`dist-tags.latest` over HTTP)
//! - `yarn info --json` client (through the package manager)

mod client;
mod npm;
mod yarn;

pub use client::HttpClient;
pub use npm::{NpmRegistry, NPM_REGISTRY_URL};
pub use yarn::YarnInfoRegistry;

use crate::error::RegistryError;
use crate::process::ProcessRunner;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Trait for registry clients
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the version tagged `latest`
    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError>;
}

/// Which registry client to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RegistryKind {
    /// `yarn info --json`
    #[default]
    Yarn,
    /// The npm registry HTTP API
    Npm,
}

/// The part of a package document both clients read
#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
}

impl PackageDocument {
    fn latest(mut self, package: &str, registry: &str) -> Result<String, RegistryError> {
        self.dist_tags
            .remove("latest")
            .ok_or_else(|| RegistryError::invalid_response(package, registry, "no 'latest' dist-tag"))
    }
}

/// Create a registry client of the given kind
pub fn create_registry(
    kind: RegistryKind,
    registry_url: &str,
    runner: Arc<dyn ProcessRunner>,
    timeout: Option<Duration>,
) -> Result<Box<dyn RegistryClient>, RegistryError> {
    match kind {
        RegistryKind::Yarn => Ok(Box::new(YarnInfoRegistry::new(runner))),
        RegistryKind::Npm => {
            let client = match timeout {
                Some(timeout) => HttpClient::with_timeout(timeout)?,
                None => HttpClient::new()?,
            };
            Ok(Box::new(NpmRegistry::new(client).with_base_url(registry_url)))
        }
    }
}
