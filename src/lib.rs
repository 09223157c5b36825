//! Automate: an embeddable engine for nondeterministic finite automata
//!
//! An automaton is a graph of named states joined by triggered transitions.
//! Transitions may fan out to several targets and may be epsilon
//! transitions, taken without consuming a trigger. An execution tracks the
//! set of states the automaton is in and advances it one trigger at a time,
//! firing the entry, exit and stay hooks attached to states.
//!
//! # Core Concepts
//!
//! - **State**: Named node with optional hooks, identified by name alone
//! - **Trigger**: Epsilon, text, or a caller-defined kind
//! - **Automate**: Start state, error state, end-state names and the transition table
//! - **Execution**: One run of an automaton with its step policy
//! - **Storage**: Records for saving and restoring automata and executions
//!
//! # Example
//!
//! ```rust
//! use automate::builder::{AutomateBuilder, ExecutionBuilder};
//! use automate::core::{Callback, State, Trigger};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = AutomateBuilder::new();
//! builder
//!     .add_state("q0")?
//!     .add_state("q1")?
//!     .add_state(State::new("accept").with_on_entry(Callback::new("accepted", || {})))?
//!     .add_state("error")?
//!     .add_end_state("accept")?
//!     .set_start_state("q0")?
//!     .set_error_state("error")?
//!     .add_transition("q0", "a", ["q0", "q1"])?
//!     .add_transition("q1", Trigger::Epsilon, ["accept"])?;
//!
//! let mut execution = ExecutionBuilder::new()
//!     .automate(builder.build()?)
//!     .build()?;
//!
//! execution.start();
//! execution.update("a")?;
//!
//! assert_eq!(execution.current_state_names(), vec!["accept", "q0", "q1"]);
//! assert_eq!(execution.encountered_end_states().names(), vec![vec!["accept"]]);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod execution;
pub mod storage;

// Re-export commonly used types
pub use crate::builder::{AutomateBuilder, BuildError, ExecutionBuilder};
pub use crate::core::{Automate, Callback, State, StateRef, StateSet, Trigger};
pub use crate::execution::{Execution, ExecutionConfiguration, ExecutionError};
