//! Reporting of the run's observable log lines
//!
//! This module provides:
//! - The `Reporter` trait every component writes its contract lines through
//! - `ConsoleReporter` for the binary
//! - `MemoryReporter` for recording lines in tests

use colored::Colorize;
use std::sync::Mutex;

/// Banner logged before any change is described
pub const OUTDATED_BANNER: &str = "Some packages are outdated, updating";

/// Sink for the ordered log lines of a run
pub trait Reporter: Send + Sync {
    /// Emit one line
    fn line(&self, line: &str);
}

/// Prints lines to stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn line(&self, line: &str) {
        if self.quiet {
            return;
        }
        if line == OUTDATED_BANNER {
            println!("{}", line.yellow().bold());
        } else {
            println!("{}", line);
        }
    }
}

/// Records lines in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
}

impl MemoryReporter {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines recorded so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl Reporter for MemoryReporter {
    fn line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_keeps_order() {
        let reporter = MemoryReporter::new();
        reporter.line("first");
        reporter.line(OUTDATED_BANNER);
        reporter.line("last");
        assert_eq!(reporter.lines(), vec!["first", OUTDATED_BANNER, "last"]);
    }

    #[test]
    fn test_console_reporter_quiet() {
        let reporter = ConsoleReporter::new(true);
        reporter.line("not printed");
    }

    #[test]
    fn test_reporter_is_object_safe() {
        let reporter: Box<dyn Reporter> = Box::new(MemoryReporter::new());
        reporter.line("line");
    }
}
