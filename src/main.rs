//! anchorlink - a live index of named anchors in comments and markdown
//!
//! anchorlink provides:
//! - Comment-aware and markdown-aware anchor/link scanning
//! - File discovery with a layered ignore stack
//! - Link resolution against the latest index snapshot
//! - A debounced watch mode with duplicate-id reporting
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod anchors;
mod backends;
mod cli;
mod core;
mod engine;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    cli::run(cli)
}

/// Diagnostics go to stderr; RUST_LOG wins over the verbosity flags
fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "anchorlink=debug,warn"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
