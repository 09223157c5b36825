//! Builder API for automata and executions.
//!
//! [`AutomateBuilder`] validates every reference as it is added and
//! produces an [`Automate`](crate::core::Automate); [`ExecutionBuilder`]
//! pairs an automaton with an
//! [`ExecutionConfiguration`](crate::execution::ExecutionConfiguration).
//! The [`automate!`](crate::automate) macro wraps the former for graphs
//! written inline.

pub mod automate;
pub mod error;
pub mod execution;
pub mod macros;

pub use automate::AutomateBuilder;
pub use error::BuildError;
pub use execution::ExecutionBuilder;
