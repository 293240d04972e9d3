//! package.json model
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies
//! - the `workspaces` field of a monorepo root
//!
//! The document is kept as a `serde_json::Value` with key order preserved,
//! so rendering changes nothing but the ranges that were set.

use crate::domain::{Dependency, DependencySection};
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed package.json
#[derive(Debug, Clone, PartialEq)]
pub struct PackageJson {
    path: PathBuf,
    document: Map<String, Value>,
}

impl PackageJson {
    /// Parse manifest text; `path` is used for error messages and identity
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(&path, e.to_string()))?;

        match value {
            Value::Object(document) => Ok(Self { path, document }),
            _ => Err(ManifestError::invalid(path, "top level is not an object")),
        }
    }

    /// Read and parse a manifest from disk
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        Self::parse(path, &content)
    }

    /// Path the manifest was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `name` field
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    /// String-valued declarations in section order, then key order
    pub fn dependencies(&self) -> Vec<Dependency> {
        let mut dependencies = Vec::new();

        for section in DependencySection::all() {
            let Some(deps) = self.section(*section) else {
                continue;
            };
            for (name, range) in deps {
                if let Some(range) = range.as_str() {
                    dependencies.push(Dependency::new(name.clone(), range, *section));
                }
            }
        }

        dependencies
    }

    /// Replace the range of `name` in `section`; false if it is not declared there
    pub fn set_range(&mut self, section: DependencySection, name: &str, range: &str) -> bool {
        let Some(deps) = self
            .document
            .get_mut(section.key())
            .and_then(Value::as_object_mut)
        else {
            return false;
        };

        match deps.get_mut(name) {
            Some(value) if value.is_string() => {
                *value = Value::String(range.to_string());
                true
            }
            _ => false,
        }
    }

    /// Glob patterns of the `workspaces` field
    ///
    /// Accepts both the array form and the `{ "packages": [...] }` form.
    pub fn workspace_patterns(&self) -> Vec<String> {
        let patterns = match self.document.get("workspaces") {
            Some(Value::Array(items)) => Some(items),
            Some(Value::Object(obj)) => obj.get("packages").and_then(Value::as_array),
            _ => None,
        };

        patterns
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Render as 2-space-indented JSON with a trailing newline
    pub fn render(&self) -> Result<String, ManifestError> {
        let mut text = serde_json::to_string_pretty(&self.document).map_err(|e| {
            ManifestError::SerializeError {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        text.push('\n');
        Ok(text)
    }

    fn section(&self, section: DependencySection) -> Option<&Map<String, Value>> {
        self.document.get(section.key()).and_then(Value::as_object)
    }
}
