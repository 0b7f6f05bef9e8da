//! Command-line front end: argument parsing and command execution, kept
//! apart from `main` so commands can be driven from tests.

pub mod commands;
pub mod config;

pub use commands::run;
pub use config::{Cli, CliConfig, ColorChoice, Command};
