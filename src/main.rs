//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `plainfetch` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Printing the rendered text and reporting errors
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use plainfetch::config::Cli;
use plainfetch::initialization::{init_crypto_provider, init_logger_with};
use plainfetch::{fetch_text, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::default();

    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    match fetch_text(&cli.url, &config).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            eprintln!("plainfetch error [{}]: {e}", e.kind());
            process::exit(1);
        }
    }
}
