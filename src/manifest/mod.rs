//! Manifest reading and writing
//!
//! This module provides functionality to:
//! - Parse package.json files into dependency declarations
//! - Replace declared ranges while keeping key order
//! - Persist updated files atomically

mod package_json;
mod writer;

pub use package_json::PackageJson;
pub use writer::write_atomic;

/// File name of an npm manifest
pub const MANIFEST_FILENAME: &str = "package.json";
