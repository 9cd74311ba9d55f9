//! LANDPRO CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, dispatch to
//! the catalog, settings, or engine-run subcommand, and exit with the
//! appropriate status. For programmatic use, prefer the library API
//! (`landpro::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
