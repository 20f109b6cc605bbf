//! # CLI
//!
//! Argument parsing and command dispatch: `serve` runs the HTTP API,
//! `import` bulk-loads a JSON fixture, `flush` empties the tours
//! collection. Every failure propagates to a non-zero exit code.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
