use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{failed} of {total} engine run(s) failed")]
    DispatchFailed { failed: usize, total: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
