//! npm Registry client
//!
//! Reads `dist-tags.latest` from the package document.
//! API endpoint: {registry}/{package}, with the scope separator encoded.

use super::{PackageDocument, RegistryClient};
use crate::error::RegistryError;
use crate::registry::HttpClient;
use async_trait::async_trait;
use tracing::debug;

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm Registry client
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistry {
    /// Create a client for the public npm registry
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: NPM_REGISTRY_URL.to_string(),
        }
    }

    /// Use another registry, such as a private mirror
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            package.replace('/', "%2f")
        )
    }
}

#[async_trait]
impl RegistryClient for NpmRegistry {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError> {
        let url = self.build_url(package);
        debug!("Fetching {}", url);

        let document: PackageDocument = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;
        document.latest(package, self.registry_name())
    }
}
