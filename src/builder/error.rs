//! Build errors for automaton and execution builders.

use thiserror::Error;

/// Errors that can occur when assembling automata and executions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Already has a state named '{name}'. State names must be unique")]
    DuplicateState { name: String },

    #[error("No state named '{name}' found. Call .add_state() first")]
    UnknownState { name: String },

    #[error("Start state not specified. Call .set_start_state() before .build()")]
    MissingStartState,

    #[error("Error state not specified. Call .set_error_state() before .build()")]
    MissingErrorState,

    #[error("Automate not specified. Call .automate() before .build()")]
    MissingAutomate,
}
