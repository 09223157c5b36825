//! Validating builder for automata.

use crate::builder::error::BuildError;
use crate::core::{
    AsStateName, Automate, IntoStateRef, StateRef, StateSet, Trigger, TransitionKey,
    TransitionTable,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Staged, validating assembler for [`Automate`].
///
/// Every state must be added before anything refers to it. Each state
/// name maps to exactly one instance, and that instance is the one the
/// transition table, start/error slots and executions share. A call that
/// fails leaves the builder exactly as it was.
///
/// Adding a transition for a (source, trigger) pair that already exists
/// merges the new targets into the existing set.
///
/// # Example
///
/// ```rust
/// use automate::builder::{AutomateBuilder, BuildError};
///
/// # fn main() -> Result<(), BuildError> {
/// let mut builder = AutomateBuilder::new();
/// builder
///     .add_state("pair")?
///     .add_state("nonPair")?
///     .add_state("error")?
///     .set_start_state("pair")?
///     .set_error_state("error")?
///     .add_transition("pair", "1", ["nonPair"])?
///     .add_transition("pair", "0", ["pair"])?
///     .add_transition("nonPair", "1", ["pair"])?
///     .add_transition("nonPair", "0", ["nonPair"])?;
///
/// let automate = builder.build()?;
/// assert_eq!(automate.start_state().name(), "pair");
/// assert_eq!(automate.transition_table().len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AutomateBuilder {
    states: HashMap<String, StateRef>,
    transitions: HashMap<TransitionKey, StateSet>,
    start_state: Option<StateRef>,
    error_state: Option<StateRef>,
    end_state_names: BTreeSet<String>,
}

impl AutomateBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state. Names must be unique.
    pub fn add_state(&mut self, state: impl IntoStateRef) -> Result<&mut Self, BuildError> {
        let state = state.into_state_ref();
        if self.states.contains_key(state.name()) {
            return Err(BuildError::DuplicateState {
                name: state.name().to_string(),
            });
        }
        self.states.insert(state.name().to_string(), state);
        Ok(self)
    }

    /// Mark a previously added state as an end state.
    pub fn add_end_state(&mut self, state: impl AsStateName) -> Result<&mut Self, BuildError> {
        let state = self.lookup(state.state_name())?;
        self.end_state_names.insert(state.name().to_string());
        Ok(self)
    }

    pub fn set_start_state(&mut self, state: impl AsStateName) -> Result<&mut Self, BuildError> {
        self.start_state = Some(self.lookup(state.state_name())?);
        Ok(self)
    }

    pub fn set_error_state(&mut self, state: impl AsStateName) -> Result<&mut Self, BuildError> {
        self.error_state = Some(self.lookup(state.state_name())?);
        Ok(self)
    }

    /// Add a transition from `source` on `trigger` to every state in
    /// `targets`, merging with any existing targets for the same pair.
    pub fn add_transition<N>(
        &mut self,
        source: impl AsStateName,
        trigger: impl Into<Trigger>,
        targets: impl IntoIterator<Item = N>,
    ) -> Result<&mut Self, BuildError>
    where
        N: AsStateName,
    {
        let source = self.lookup(source.state_name())?;
        let targets = targets
            .into_iter()
            .map(|target| self.lookup(target.state_name()))
            .collect::<Result<StateSet, _>>()?;

        self.transitions
            .entry(TransitionKey::new(source, trigger))
            .or_default()
            .extend(targets);
        Ok(self)
    }

    /// Reset the builder to its empty state.
    pub fn clear(&mut self) -> &mut Self {
        self.states.clear();
        self.transitions.clear();
        self.start_state = None;
        self.error_state = None;
        self.end_state_names.clear();
        self
    }

    /// Look up the instance registered for `name`.
    pub fn state(&self, name: &str) -> Option<&StateRef> {
        self.states.get(name)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Assemble the automaton. The builder stays usable afterwards.
    pub fn build(&self) -> Result<Automate, BuildError> {
        let start_state = self
            .start_state
            .clone()
            .ok_or(BuildError::MissingStartState)?;
        let error_state = self
            .error_state
            .clone()
            .ok_or(BuildError::MissingErrorState)?;

        tracing::debug!(
            states = self.states.len(),
            transitions = self.transitions.len(),
            start = start_state.name(),
            error = error_state.name(),
            "built automate"
        );

        Ok(Automate::new(
            start_state,
            error_state,
            self.end_state_names.clone(),
            TransitionTable::from_entries(self.transitions.clone()),
        ))
    }

    fn lookup(&self, name: &str) -> Result<StateRef, BuildError> {
        self.states
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| BuildError::UnknownState {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Callback, State};

    fn names(states: &StateSet) -> Vec<&str> {
        states.iter().map(|s| s.name()).collect()
    }

    fn base() -> AutomateBuilder {
        let mut builder = AutomateBuilder::new();
        builder
            .add_state("a")
            .unwrap()
            .add_state("b")
            .unwrap()
            .add_state("c")
            .unwrap()
            .add_state("error")
            .unwrap();
        builder
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let mut builder = base();
        let result = builder.add_state(State::new("a"));

        assert!(matches!(
            result,
            Err(BuildError::DuplicateState { name }) if name == "a"
        ));
    }

    #[test]
    fn references_to_unknown_states_are_rejected() {
        let mut builder = base();

        assert!(matches!(
            builder.set_start_state("missing"),
            Err(BuildError::UnknownState { .. })
        ));
        assert!(matches!(
            builder.set_error_state("missing"),
            Err(BuildError::UnknownState { .. })
        ));
        assert!(matches!(
            builder.add_end_state("missing"),
            Err(BuildError::UnknownState { .. })
        ));
        assert!(matches!(
            builder.add_transition("missing", "x", ["a"]),
            Err(BuildError::UnknownState { .. })
        ));
    }

    #[test]
    fn failed_transition_leaves_builder_untouched() {
        let mut builder = base();
        builder.add_transition("a", "x", ["b"]).unwrap();

        let result = builder.add_transition("a", "x", ["c", "missing"]);
        assert!(matches!(
            result,
            Err(BuildError::UnknownState { name }) if name == "missing"
        ));

        builder.set_start_state("a").unwrap().set_error_state("error").unwrap();
        let automate = builder.build().unwrap();
        let a = automate.state("a").unwrap();
        let targets = automate
            .transition_table()
            .direct_targets(&a, &Trigger::text("x"));
        assert_eq!(names(&targets), vec!["b"]);
    }

    #[test]
    fn repeated_transition_merges_targets() {
        let mut builder = base();
        builder
            .add_transition("a", "x", ["b"])
            .unwrap()
            .add_transition("a", "x", ["c", "b"])
            .unwrap()
            .set_start_state("a")
            .unwrap()
            .set_error_state("error")
            .unwrap();

        let automate = builder.build().unwrap();
        let a = automate.start_state().clone();
        let table = automate.transition_table();

        assert_eq!(table.len(), 1);
        assert_eq!(names(&table.direct_targets(&a, &Trigger::text("x"))), vec!["b", "c"]);
    }

    #[test]
    fn build_requires_start_and_error() {
        let mut builder = base();
        assert_eq!(builder.build().unwrap_err(), BuildError::MissingStartState);

        builder.set_start_state("a").unwrap();
        assert_eq!(builder.build().unwrap_err(), BuildError::MissingErrorState);

        builder.set_error_state("error").unwrap();
        assert!(builder.build().is_ok());
    }

    #[test]
    fn clear_resets_everything() {
        let mut builder = base();
        builder
            .add_end_state("b")
            .unwrap()
            .add_transition("a", "x", ["b"])
            .unwrap()
            .set_start_state("a")
            .unwrap()
            .set_error_state("error")
            .unwrap();

        builder.clear();

        assert!(!builder.has_state("a"));
        assert_eq!(builder.build().unwrap_err(), BuildError::MissingStartState);
        builder.add_state("a").unwrap();
    }

    #[test]
    fn states_passed_by_value_resolve_to_registered_instance() {
        let entered = Callback::new("entered", || {});
        let mut builder = AutomateBuilder::new();
        builder
            .add_state(State::new("a").with_on_entry(entered))
            .unwrap()
            .add_state("error")
            .unwrap()
            .set_start_state(&State::new("a"))
            .unwrap()
            .set_error_state("error")
            .unwrap();

        let automate = builder.build().unwrap();
        let registered = builder.state("a").unwrap();

        assert!(Arc::ptr_eq(automate.start_state(), registered));
        assert_eq!(automate.start_state().on_entry().unwrap().name(), "entered");
    }

    #[test]
    fn shared_handle_keeps_caller_instance() {
        let handle: StateRef = Arc::new(State::new("a"));
        let mut builder = AutomateBuilder::new();
        builder
            .add_state(Arc::clone(&handle))
            .unwrap()
            .add_state("error")
            .unwrap()
            .set_start_state("a")
            .unwrap()
            .set_error_state("error")
            .unwrap();

        let automate = builder.build().unwrap();
        handle.set_on_stay(Some(Callback::new("late", || {})));

        assert_eq!(automate.start_state().on_stay().unwrap().name(), "late");
    }

    #[test]
    fn end_states_recorded_by_name() {
        let mut builder = base();
        builder
            .add_end_state("c")
            .unwrap()
            .add_transition("a", "x", ["c"])
            .unwrap()
            .set_start_state("a")
            .unwrap()
            .set_error_state("error")
            .unwrap();

        let automate = builder.build().unwrap();
        assert!(automate.is_end_state_name("c"));
        assert_eq!(names(&automate.end_states()), vec!["c"]);
    }
}
