//! Error types for pontoon-core.

use std::time::Duration;

use thiserror::Error;

/// Result type for pontoon-core operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while bridging into async execution.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The operation did not finish within its time budget.
    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),

    /// The operation panicked while running.
    #[error("operation panicked: {0}")]
    Panicked(String),

    /// A runtime for the operation could not be set up.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// The worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker finished without delivering an outcome.
    #[error("worker finished without delivering an outcome")]
    MissingOutcome,
}

impl BridgeError {
    /// Whether this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::TimedOut(_))
    }
}
