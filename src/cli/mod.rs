//! Command Line Interface (CLI) layer for LANDPRO.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the operational entry points:
//! catalog listing, runtime configuration, and dispatching already-built
//! properties files.
//!
//! If you are embedding LANDPRO into another application, prefer using
//! the high-level `landpro::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
