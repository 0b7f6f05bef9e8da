//! Faultline CLI
//!
//! Serializes captured errors, renders error reports and inspects origins
//! and kinds from the command line.

use anyhow::Context;
use clap::Parser;
use faultline_cli::{run, Cli};
use faultline_observability::tracing_setup;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_setup::init_tracing();

    let config = Cli::parse().into_config().context("Failed to parse arguments")?;
    debug!(command = config.command.label(), runtime = %config.runtime, "Running command");

    let output = run(&config)?;
    println!("{output}");
    Ok(())
}
