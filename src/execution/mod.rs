//! Running an automaton.
//!
//! An [`Execution`] steps a shared [`Automate`](crate::core::Automate)
//! one trigger at a time, firing state hooks and recording end states.
//! [`ExecutionConfiguration`] holds the step policy.

mod config;
mod error;
mod machine;

pub use config::ExecutionConfiguration;
pub use error::ExecutionError;
pub use machine::Execution;
