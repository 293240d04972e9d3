//! Application error types using thiserror
//!
//! Error hierarchy:
//! - DiscoveryError: workspace scanning failed
//! - ManifestError: a package.json could not be read, parsed or rendered
//! - LockfileError: yarn.lock could not be read or parsed
//! - RegistryError: the latest version of a package could not be determined
//! - WriteError: an updated manifest or lockfile could not be persisted
//! - ProcessError: a package manager subprocess failed
//! - ConfigError: invalid CLI configuration

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Lockfile(#[from] LockfileError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while discovering workspace packages
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Workspace root does not exist or is not a directory
    #[error("workspace root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// A workspace glob could not be expanded
    #[error("invalid workspace pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A discovered manifest is unreadable or malformed
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Errors related to package.json files
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// Valid JSON, but not a package manifest
    #[error("invalid manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// Failed to render the manifest back to JSON
    #[error("failed to serialize manifest {path}: {message}")]
    SerializeError { path: PathBuf, message: String },
}

/// Errors related to the yarn lockfile
#[derive(Error, Debug)]
pub enum LockfileError {
    /// Failed to read the lockfile
    #[error("failed to read lockfile {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed lockfile text
    #[error("failed to parse lockfile at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Errors related to package registry queries
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Query did not finish within the deadline
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// The query subprocess failed
    #[error("failed to query '{package}': {source}")]
    Process {
        package: String,
        #[source]
        source: ProcessError,
    },
}

/// Errors raised while persisting updated files
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to write a manifest file
    #[error("failed to write manifest file {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the lockfile
    #[error("failed to write lockfile {path}: {source}")]
    Lockfile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by package manager subprocesses
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The command could not be started
    #[error("failed to run '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exited unsuccessfully
    #[error("'{command}' exited with {}{}", exit_status_label(.code), stderr_suffix(.stderr))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The command did not finish within the deadline
    #[error("'{command}' timed out after {after:?}")]
    Timeout { command: String, after: Duration },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid tracked package pattern
    #[error("invalid package pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

fn exit_status_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

// Inherited stderr was already shown, so there is nothing to append
fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidManifest error
    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl LockfileError {
    /// Creates a new Parse error for a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        LockfileError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Returns true if the registry does not know the package
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::PackageNotFound { .. })
    }
}

impl WriteError {
    /// Creates a new manifest write error
    pub fn manifest(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WriteError::Manifest {
            path: path.into(),
            source,
        }
    }

    /// Creates a new lockfile write error
    pub fn lockfile(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WriteError::Lockfile {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/package.json");
        let msg = format!("{}", err);
        assert!(msg.contains("manifest file not found"));
        assert!(msg.contains("package.json"));
    }

    #[test]
    fn test_manifest_error_json_parse() {
        let err = ManifestError::json_parse_error("/path/to/package.json", "unexpected token");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse JSON"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_lockfile_parse_error_has_line() {
        let err = LockfileError::parse(12, "unterminated quote");
        assert_eq!(
            err.to_string(),
            "failed to parse lockfile at line 12: unterminated quote"
        );
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("@backstage/core", "npm");
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "package '@backstage/core' not found in npm registry"
        );
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("@backstage/theme", "yarn");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("@backstage/theme"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_process_error_exit_status() {
        let err = ProcessError::Failed {
            command: "yarn install".to_string(),
            code: Some(1),
            stderr: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "'yarn install' exited with status 1: boom");

        let err = ProcessError::Failed {
            command: "yarn install".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "'yarn install' exited with no status (terminated by signal)"
        );
    }

    #[test]
    fn test_process_timeout_keeps_sub_second_deadline() {
        let err = ProcessError::Timeout {
            command: "yarn install".to_string(),
            after: Duration::from_millis(10),
        };
        assert_eq!(err.to_string(), "'yarn install' timed out after 10ms");

        let err = ProcessError::Timeout {
            command: "yarn install".to_string(),
            after: Duration::from_secs(600),
        };
        assert_eq!(err.to_string(), "'yarn install' timed out after 600s");
    }

    #[test]
    fn test_write_error_lockfile() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = WriteError::lockfile("/repo/yarn.lock", io);
        let msg = format!("{}", err);
        assert!(msg.contains("failed to write lockfile"));
        assert!(msg.contains("yarn.lock"));
    }

    #[test]
    fn test_app_error_from_discovery_error() {
        let err: AppError = DiscoveryError::RootNotFound {
            path: PathBuf::from("/missing"),
        }
        .into();
        assert!(err.to_string().contains("workspace root not found"));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let registry_err = RegistryError::package_not_found("pkg", "npm");
        let app_err: AppError = registry_err.into();
        assert!(app_err.to_string().contains("package 'pkg' not found"));
    }

    #[test]
    fn test_discovery_error_wraps_manifest_error() {
        let err: DiscoveryError = ManifestError::invalid("/repo/package.json", "not an object").into();
        assert_eq!(
            err.to_string(),
            "invalid manifest /repo/package.json: not an object"
        );
    }
}
