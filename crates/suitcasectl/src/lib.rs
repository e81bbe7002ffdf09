//! # suitcasectl
//!
//! **CLI binary.**
//!
//! Thin `clap` surface over the `suitcasectl-*` library crates: parses
//! arguments, initializes logging, and dispatches to a command handler.
//! This crate should contain no packing/walking/hashing logic of its own.

mod commands;

use anyhow::Result;
use clap::Parser;
use suitcasectl_options::Cli;
use tracing_subscriber::EnvFilter;

pub async fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    commands::dispatch(cli.command).await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
