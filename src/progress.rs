//! Spinner shown while the package manager reinstalls
//!
//! Disabled in quiet mode and whenever output is captured.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for an indeterminate subprocess
pub struct Progress {
    /// Whether the spinner is drawn at all
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new spinner holder
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Start spinning with a message
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .expect("Invalid template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Stop and erase the spinner
    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_spins() {
        let mut progress = Progress::new(false);
        progress.spinner("Running 'yarn install'");
        assert!(progress.bar.is_none());
        progress.finish_and_clear();
    }

    #[test]
    fn test_enabled_spinner_clears() {
        let mut progress = Progress::new(true);
        progress.spinner("Running 'yarn install'");
        assert!(progress.bar.is_some());
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }
}
