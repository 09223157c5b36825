//! Execution error types.

use thiserror::Error;

/// Errors raised while driving an execution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// `update` was called with no current states.
    #[error("Execution has no current states. Call .start() before .update()")]
    NotStarted,
}
