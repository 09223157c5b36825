//! Core automaton model.
//!
//! This module contains the data the engine runs on:
//! - States with entry/exit/stay hooks, identified by name
//! - Triggers (epsilon, text and caller-defined kinds)
//! - The transition table and its epsilon closure
//! - The assembled `Automate` and the end-state history of a run

mod automate;
mod history;
mod state;
mod table;
mod trigger;

pub use automate::Automate;
pub use history::EndStateHistory;
pub use state::{AsStateName, Callback, IntoStateRef, State, StateRef, StateSet};
pub use table::{TableError, TransitionKey, TransitionTable};
pub use trigger::{CustomTrigger, CustomValue, Trigger};
