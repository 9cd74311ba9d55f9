use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "landpro", version, about = "LANDPRO CLI")]
pub struct CliArgs {
    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// List the metrics catalog, optionally filtered
    Metrics {
        /// Filter by metric type (value, couple, patch)
        #[arg(long = "type")]
        kind: Option<String>,

        /// Filter by process family (qualitative, quantitative)
        #[arg(long)]
        process: Option<String>,

        /// Load this catalog file instead of the bundled table
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Persist the engine runtime path for future invocations
    SetRuntime {
        /// Runtime executable (e.g. /usr/bin/java)
        path: PathBuf,
    },

    /// Dispatch existing properties files to the engine, in order
    Run {
        /// Kill an engine run exceeding this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Properties files, dispatched sequentially
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}
