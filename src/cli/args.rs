//! CLI argument definitions using clap
//!
//! Commands:
//! - tourbase serve --config <path> [--port <port>]
//! - tourbase import --fixture <path> [--config <path>]
//! - tourbase flush --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tourbase - a self-hostable tour catalog REST API
#[derive(Parser, Debug)]
#[command(name = "tourbase")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./tourbase.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Bulk-import a JSON fixture into the tours collection
    Import {
        /// Path to configuration file
        #[arg(long, default_value = "./tourbase.json")]
        config: PathBuf,

        /// Path to a JSON array of tour documents
        #[arg(long, default_value = "./dev-data/tours.json")]
        fixture: PathBuf,
    },

    /// Delete every document in the tours collection
    Flush {
        /// Path to configuration file
        #[arg(long, default_value = "./tourbase.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
