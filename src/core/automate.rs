//! The assembled automaton.

use super::state::{StateRef, StateSet};
use super::table::TransitionTable;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Start state, error state, end-state names and transition table.
///
/// Usually produced by [`AutomateBuilder`](crate::builder::AutomateBuilder).
/// The table stays mutable through [`Automate::transition_table_mut`];
/// edits that name the start or error state resolve to this automaton's
/// instances.
///
/// End states are tracked by name, not by reference.
#[derive(Clone, Debug)]
pub struct Automate {
    start_state: StateRef,
    error_state: StateRef,
    end_state_names: BTreeSet<String>,
    transition_table: TransitionTable,
}

impl Automate {
    pub fn new(
        start_state: StateRef,
        error_state: StateRef,
        end_state_names: BTreeSet<String>,
        mut transition_table: TransitionTable,
    ) -> Self {
        transition_table.pin(&start_state);
        transition_table.pin(&error_state);
        Self {
            start_state,
            error_state,
            end_state_names,
            transition_table,
        }
    }

    pub fn start_state(&self) -> &StateRef {
        &self.start_state
    }

    pub fn error_state(&self) -> &StateRef {
        &self.error_state
    }

    pub fn end_state_names(&self) -> &BTreeSet<String> {
        &self.end_state_names
    }

    pub fn is_end_state_name(&self, name: &str) -> bool {
        self.end_state_names.contains(name)
    }

    pub fn transition_table(&self) -> &TransitionTable {
        &self.transition_table
    }

    pub fn transition_table_mut(&mut self) -> &mut TransitionTable {
        &mut self.transition_table
    }

    /// End states that appear somewhere in the transition table.
    ///
    /// A registered end name whose state is neither a source nor a target
    /// of any transition is not returned.
    pub fn end_states(&self) -> StateSet {
        let mut states = self.transition_table.source_states();
        states.extend(self.transition_table.target_states());
        states
            .into_iter()
            .filter(|state| self.end_state_names.contains(state.name()))
            .collect()
    }

    /// Every state reachable from the automaton's fields: table sources and
    /// targets plus the start and error states.
    pub fn states(&self) -> StateSet {
        let mut states = self.transition_table.source_states();
        states.extend(self.transition_table.target_states());
        states.insert(Arc::clone(&self.start_state));
        states.insert(Arc::clone(&self.error_state));
        states
    }

    pub fn state(&self, name: &str) -> Option<StateRef> {
        self.states().into_iter().find(|state| state.name() == name)
    }
}
