//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Validation variants (`MissingParameter`, `ConflictingParameters`) fire before any
//! file I/O; dispatch variants carry the engine's exit status unchanged.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: &'static str },

    #[error("Conflicting parameters: {} (supply at most one)", .names.join(", "))]
    ConflictingParameters { names: Vec<&'static str> },

    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },

    #[error("Value for '{key}' contains a reserved character ({{, }}, ; or ,): {value}")]
    ReservedCharacter { key: String, value: String },

    #[error(
        "No '{program}' runtime found. Install a Java runtime, or register one explicitly \
         with RuntimeLocator::set_runtime / `landpro set-runtime <path>`"
    )]
    RuntimeNotFound { program: String },

    #[error("Engine artifact not found at {}. Register one with the 'engine_path' setting", .path.display())]
    EngineArtifactNotFound { path: PathBuf },

    #[error("Metrics catalog unavailable at {}: {reason}", .path.display())]
    CatalogUnavailable { path: PathBuf, reason: String },

    #[error("Failed writing properties file {}: {source}", .path.display())]
    SerializationIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Engine exited with non-zero status: {code}")]
    EngineExit { code: i32 },

    #[error("Engine did not finish within {seconds}s and was killed")]
    TimedOut { seconds: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn missing(name: &'static str) -> Self {
        Error::MissingParameter { name }
    }

    pub fn conflicting(names: &[&'static str]) -> Self {
        Error::ConflictingParameters {
            names: names.to_vec(),
        }
    }
}
