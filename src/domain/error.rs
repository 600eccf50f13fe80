//! # Domain Errors

use thiserror::Error;

/// Failures at the review gateway. Executors render these as transcript text.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("No git repository found for {0}")]
    NoRepository(String),

    #[error("File {0} is untracked or not in git repository")]
    Untracked(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
