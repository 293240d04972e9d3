//! `yarn info` registry client
//!
//! Asks the package manager instead of the registry directly, so the
//! workspace's own `.yarnrc` settings (mirrors, auth) apply. Output is
//! newline-delimited JSON; the `inspect` line carries the package document.

use super::{PackageDocument, RegistryClient};
use crate::error::{ProcessError, RegistryError};
use crate::process::ProcessRunner;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// One line of `yarn --json` output
#[derive(Debug, Deserialize)]
struct YarnLine {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Registry client backed by `yarn info --json`
pub struct YarnInfoRegistry {
    runner: Arc<dyn ProcessRunner>,
}

impl YarnInfoRegistry {
    /// Create a client that runs `yarn`
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn parse_output(&self, package: &str, stdout: &str) -> Result<String, RegistryError> {
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            let Ok(parsed) = serde_json::from_str::<YarnLine>(line) else {
                continue;
            };
            match parsed.kind.as_str() {
                "inspect" => {
                    let document: PackageDocument = serde_json::from_value(parsed.data)
                        .map_err(|e| {
                            RegistryError::invalid_response(
                                package,
                                self.registry_name(),
                                e.to_string(),
                            )
                        })?;
                    return document.latest(package, self.registry_name());
                }
                "error" if mentions_not_found(&parsed.data.to_string()) => {
                    return Err(RegistryError::package_not_found(
                        package,
                        self.registry_name(),
                    ));
                }
                _ => {}
            }
        }

        Err(RegistryError::invalid_response(
            package,
            self.registry_name(),
            "no inspect line in yarn output",
        ))
    }
}

fn mentions_not_found(text: &str) -> bool {
    text.contains("Not found") || text.contains("404")
}

#[async_trait]
impl RegistryClient for YarnInfoRegistry {
    fn registry_name(&self) -> &'static str {
        "yarn"
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError> {
        let stdout = match self
            .runner
            .run_capture("yarn", &["info", "--json", package])
            .await
        {
            Ok(stdout) => stdout,
            Err(ProcessError::Failed { ref stderr, .. }) if mentions_not_found(stderr) => {
                return Err(RegistryError::package_not_found(
                    package,
                    self.registry_name(),
                ));
            }
            Err(ProcessError::Timeout { .. }) => {
                return Err(RegistryError::timeout(package, self.registry_name()));
            }
            Err(source) => {
                return Err(RegistryError::Process {
                    package: package.to_string(),
                    source,
                });
            }
        };

        self.parse_output(package, &stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock runner returning a canned `yarn info` result
    struct CannedRunner {
        result: Mutex<Option<Result<String, ProcessError>>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl CannedRunner {
        fn new(result: Result<String, ProcessError>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(result)),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ProcessRunner for CannedRunner {
        async fn run_capture(&self, command: &str, args: &[&str]) -> Result<String, ProcessError> {
            let mut call = vec![command.to_string()];
            call.extend(args.iter().map(|a| a.to_string()));
            self.calls.lock().unwrap().push(call);
            self.result.lock().unwrap().take().unwrap()
        }

        async fn run(&self, _command: &str, _args: &[&str]) -> Result<(), ProcessError> {
            Ok(())
        }
    }

    const INSPECT: &str = r#"{"type":"inspect","data":{"name":"@backstage/theme","dist-tags":{"latest":"2.0.0"},"versions":["1.0.0","2.0.0"]}}"#;

    #[tokio::test]
    async fn test_fetch_latest_runs_yarn_info() {
        let runner = CannedRunner::new(Ok(format!("{}\n", INSPECT)));
        let registry = YarnInfoRegistry::new(runner.clone());

        let latest = registry.fetch_latest("@backstage/theme").await.unwrap();

        assert_eq!(latest, "2.0.0");
        assert_eq!(
            runner.calls.lock().unwrap()[0],
            vec!["yarn", "info", "--json", "@backstage/theme"]
        );
    }

    #[tokio::test]
    async fn test_fetch_latest_skips_other_lines() {
        let stdout = format!(
            "{}\n{}\n",
            r#"{"type":"warning","data":"package.json: No license field"}"#, INSPECT
        );
        let registry = YarnInfoRegistry::new(CannedRunner::new(Ok(stdout)));
        assert_eq!(registry.fetch_latest("@backstage/theme").await.unwrap(), "2.0.0");
    }

    #[tokio::test]
    async fn test_not_found_from_stderr() {
        let runner = CannedRunner::new(Err(ProcessError::Failed {
            command: "yarn info --json nope".to_string(),
            code: Some(1),
            stderr: r#"{"type":"error","data":"Received invalid response from npm."}
{"type":"error","data":"An unexpected error occurred: \"https://registry.yarnpkg.com/nope: Not found\"."}"#
                .to_string(),
        }));
        let err = YarnInfoRegistry::new(runner)
            .fetch_latest("nope")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_other_failure_is_process_error() {
        let runner = CannedRunner::new(Err(ProcessError::Failed {
            command: "yarn info --json a".to_string(),
            code: Some(1),
            stderr: "network down".to_string(),
        }));
        let err = YarnInfoRegistry::new(runner)
            .fetch_latest("a")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Process { .. }));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_registry_timeout() {
        let runner = CannedRunner::new(Err(ProcessError::Timeout {
            command: "yarn info --json a".to_string(),
            after: Duration::from_secs(120),
        }));
        let err = YarnInfoRegistry::new(runner)
            .fetch_latest("a")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_missing_inspect_line() {
        let registry = YarnInfoRegistry::new(CannedRunner::new(Ok(String::new())));
        let err = registry.fetch_latest("a").await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidResponse { .. }));
    }
}
