//! The stepping engine.

use crate::core::{Automate, EndStateHistory, StateRef, StateSet, Trigger};
use crate::execution::config::ExecutionConfiguration;
use crate::execution::error::ExecutionError;
use std::sync::Arc;
use uuid::Uuid;

/// One run of an automaton.
///
/// Holds the current state set, the end states seen so far and the step
/// policy. The automaton is shared and never modified through the
/// execution. Mutation happens only through [`start`](Self::start),
/// [`update`](Self::update) and [`reset`](Self::reset); the accessors hand
/// out read-only views.
///
/// Hooks of different states in the same step fire in state-name order.
/// That order is stable but is not part of the contract. For a single
/// source state, target entry hooks always fire before the source's exit
/// or stay hook.
///
/// # Example
///
/// ```rust
/// use automate::automate;
/// use automate::execution::{Execution, ExecutionConfiguration};
///
/// let automate = automate! {
///     states: ["pair", "nonPair", "error"],
///     start: "pair",
///     error: "error",
///     transitions: [
///         ("pair", "1") => ["nonPair"],
///         ("pair", "0") => ["pair"],
///         ("nonPair", "1") => ["pair"],
///         ("nonPair", "0") => ["nonPair"],
///     ],
/// }
/// .unwrap();
///
/// let mut execution = Execution::new(automate.into(), ExecutionConfiguration::default());
/// execution.start();
/// execution.update_all(["0", "1", "0", "0", "1"]).unwrap();
///
/// assert_eq!(execution.current_state_names(), vec!["pair"]);
/// ```
#[derive(Debug)]
pub struct Execution {
    id: Uuid,
    automate: Arc<Automate>,
    configuration: ExecutionConfiguration,
    current_states: StateSet,
    encountered_end_states: EndStateHistory,
}

impl Execution {
    /// Create an unstarted execution.
    pub fn new(automate: Arc<Automate>, configuration: ExecutionConfiguration) -> Self {
        Self {
            id: Uuid::new_v4(),
            automate,
            configuration,
            current_states: StateSet::new(),
            encountered_end_states: EndStateHistory::new(),
        }
    }

    /// Reassemble an execution from persisted parts.
    pub(crate) fn restore(
        id: Uuid,
        automate: Arc<Automate>,
        configuration: ExecutionConfiguration,
        current_states: StateSet,
        encountered_end_states: EndStateHistory,
    ) -> Self {
        Self {
            id,
            automate,
            configuration,
            current_states,
            encountered_end_states,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn automate(&self) -> &Arc<Automate> {
        &self.automate
    }

    pub fn configuration(&self) -> &ExecutionConfiguration {
        &self.configuration
    }

    pub fn current_states(&self) -> &StateSet {
        &self.current_states
    }

    pub fn current_state_names(&self) -> Vec<&str> {
        self.current_states.iter().map(|state| state.name()).collect()
    }

    pub fn encountered_end_states(&self) -> &EndStateHistory {
        &self.encountered_end_states
    }

    pub fn is_started(&self) -> bool {
        !self.current_states.is_empty()
    }

    /// Enter the start state and its epsilon closure.
    ///
    /// Fires the entry hook of every state entered, including the start
    /// state itself, and records any end states among them. Returns
    /// `true` while the execution can keep going.
    pub fn start(&mut self) -> bool {
        let seeds: StateSet = std::iter::once(Arc::clone(self.automate.start_state())).collect();
        self.current_states = self.automate.transition_table().epsilon_closure(&seeds);

        let mut end_states = StateSet::new();
        for state in &self.current_states {
            state.fire_entry();
            if self.automate.is_end_state_name(state.name()) {
                end_states.insert(Arc::clone(state));
            }
        }
        self.encountered_end_states.record(end_states);

        tracing::debug!(
            execution = %self.id,
            start = self.automate.start_state().name(),
            current = self.current_states.len(),
            "execution started"
        );

        !self.is_at_end()
    }

    /// Consume one trigger.
    ///
    /// Every current state is processed on its own and the successors are
    /// merged. Returns `true` while the execution can keep going.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::NotStarted`] if there are no current states.
    pub fn update(&mut self, trigger: impl Into<Trigger>) -> Result<bool, ExecutionError> {
        let trigger = trigger.into();
        if self.current_states.is_empty() {
            return Err(ExecutionError::NotStarted);
        }

        let mut next_states = StateSet::new();
        let mut end_states = StateSet::new();

        for state in &self.current_states {
            let targets = self
                .automate
                .transition_table()
                .resolve_with_epsilon(state, &trigger);

            // Entry hooks fire once per source, even for shared targets.
            for target in &targets {
                target.fire_entry();
                if self.automate.is_end_state_name(target.name()) {
                    end_states.insert(Arc::clone(target));
                }
            }

            next_states.extend(self.successors(state, targets));
        }

        tracing::debug!(
            execution = %self.id,
            trigger = %trigger,
            from = self.current_states.len(),
            to = next_states.len(),
            end_states = end_states.len(),
            "execution step"
        );

        self.current_states = next_states;
        self.encountered_end_states.record(end_states);

        Ok(!self.is_at_end())
    }

    /// Apply [`update`](Self::update) to each trigger in order.
    ///
    /// Returns one result per trigger and stops at the first error.
    pub fn update_all<I, T>(&mut self, triggers: I) -> Result<Vec<bool>, ExecutionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Trigger>,
    {
        triggers
            .into_iter()
            .map(|trigger| self.update(trigger))
            .collect()
    }

    /// Whether the run is over.
    ///
    /// True when the only current state is the error state. Otherwise, if
    /// `exit_on_end_state_encountered` is set, true once any end state has
    /// ever been seen, even if the execution has since moved on.
    pub fn is_at_end(&self) -> bool {
        let error_state = self.automate.error_state();
        if self.current_states.len() == 1 && self.current_states.contains(error_state) {
            return true;
        }

        if self.configuration.exit_on_end_state_encountered {
            return !self.encountered_end_states.is_empty();
        }

        false
    }

    /// Drop the current states. The end-state history and configuration
    /// are kept; call [`start`](Self::start) to run again.
    pub fn reset(&mut self) {
        self.current_states.clear();
    }

    // Successor contribution of one source state; fires its exit or stay
    // hook and, when the step fails, the error state's entry hook.
    fn successors(&self, state: &StateRef, targets: StateSet) -> StateSet {
        let error_state = self.automate.error_state();

        if targets.is_empty() {
            if self.configuration.allow_stay_on_undefined_transition {
                state.fire_stay();
                return StateSet::from([Arc::clone(state)]);
            }
            state.fire_exit();
            tracing::trace!(execution = %self.id, state = state.name(), "no transition, entering error state");
            error_state.fire_entry();
            return StateSet::from([Arc::clone(error_state)]);
        }

        state.fire_exit();
        if targets.len() == 1 || self.configuration.allow_multiple_target_states {
            return targets;
        }

        tracing::trace!(
            execution = %self.id,
            state = state.name(),
            targets = targets.len(),
            "nondeterministic step not allowed, entering error state"
        );
        error_state.fire_entry();
        StateSet::from([Arc::clone(error_state)])
    }
}
