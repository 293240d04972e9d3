//! lockbump - Monorepo dependency version bumper CLI tool
//!
//! Bumps a family of npm packages (by default `@backstage/*`) across a yarn
//! workspace:
//! - Drops stale yarn.lock entries so they re-resolve to the latest version
//! - Rewrites package.json ranges that exclude the latest version
//! - Reinstalls with the package manager

use colored::Colorize;
use lockbump::cli::CliArgs;
use lockbump::orchestrator::{BumpConfig, Orchestrator};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse_args();
    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; RUST_LOG overrides the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("lockbump v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let config = BumpConfig::from_cli(&args);
    let orchestrator = Orchestrator::new(config)?;
    let outcome = orchestrator.run().await?;

    if !args.quiet {
        println!("{}", outcome.summary());
    }

    Ok(ExitCode::SUCCESS)
}
