//! Transition table and epsilon closure.

use super::state::{State, StateRef, StateSet};
use super::trigger::Trigger;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;

/// Errors from direct table mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("transition from '{state}' on {trigger} already exists")]
    DuplicateTransition { state: String, trigger: String },

    #[error("no transition from '{state}' on {trigger} to update")]
    MissingTransition { state: String, trigger: String },
}

impl TableError {
    fn duplicate(key: &TransitionKey) -> Self {
        TableError::DuplicateTransition {
            state: key.state.name().to_string(),
            trigger: key.trigger.to_string(),
        }
    }

    fn missing(key: &TransitionKey) -> Self {
        TableError::MissingTransition {
            state: key.state.name().to_string(),
            trigger: key.trigger.to_string(),
        }
    }
}

/// Source state and trigger of a transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionKey {
    pub state: StateRef,
    pub trigger: Trigger,
}

impl TransitionKey {
    pub fn new(state: StateRef, trigger: impl Into<Trigger>) -> Self {
        Self {
            state,
            trigger: trigger.into(),
        }
    }
}

/// Mapping from (state, trigger) to the set of target states.
///
/// A key that is absent maps to the empty set. Epsilon transitions are
/// ordinary entries keyed by [`Trigger::Epsilon`].
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    transitions: HashMap<TransitionKey, StateSet>,
    // Instances owned outside the table that inserts must resolve to.
    pinned: Vec<StateRef>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from entries already sharing canonical states.
    pub(crate) fn from_entries(transitions: HashMap<TransitionKey, StateSet>) -> Self {
        Self {
            transitions,
            pinned: Vec::new(),
        }
    }

    /// Make `state` the canonical instance for its name.
    ///
    /// Entries already holding another instance with the same name are
    /// rewritten, and later inserts resolve to `state`.
    pub(crate) fn pin(&mut self, state: &StateRef) {
        self.pinned.retain(|known| known != state);
        self.pinned.push(Arc::clone(state));

        let canonical = |candidate: StateRef| {
            if candidate == *state {
                Arc::clone(state)
            } else {
                candidate
            }
        };
        self.transitions = std::mem::take(&mut self.transitions)
            .into_iter()
            .map(|(key, targets)| {
                let key = TransitionKey {
                    state: canonical(key.state),
                    trigger: key.trigger,
                };
                let targets: StateSet = targets.into_iter().map(canonical).collect();
                (key, targets)
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Iterate over every entry of the table.
    pub fn transitions(&self) -> impl Iterator<Item = (&TransitionKey, &StateSet)> {
        self.transitions.iter()
    }

    /// All entries whose source is `state`.
    pub fn transitions_from(&self, state: &State) -> Vec<(&Trigger, &StateSet)> {
        self.transitions
            .iter()
            .filter(|(key, _)| key.state.as_ref() == state)
            .map(|(key, targets)| (&key.trigger, targets))
            .collect()
    }

    /// Targets of the exact (state, trigger) key, without epsilon closure.
    pub fn direct_targets(&self, state: &StateRef, trigger: &Trigger) -> StateSet {
        let key = TransitionKey {
            state: Arc::clone(state),
            trigger: trigger.clone(),
        };
        self.transitions.get(&key).cloned().unwrap_or_default()
    }

    /// Smallest superset of `seeds` closed under epsilon transitions.
    pub fn epsilon_closure(&self, seeds: &StateSet) -> StateSet {
        let mut closure = StateSet::new();
        let mut frontier: VecDeque<StateRef> = seeds.iter().cloned().collect();

        while let Some(state) = frontier.pop_front() {
            if !closure.insert(Arc::clone(&state)) {
                continue;
            }
            for target in self.direct_targets(&state, &Trigger::Epsilon) {
                if !closure.contains(&target) {
                    frontier.push_back(target);
                }
            }
        }

        closure
    }

    /// Direct targets followed by their epsilon closure.
    ///
    /// A dead transition stays dead: closure is never applied to an empty
    /// direct result.
    pub fn resolve_with_epsilon(&self, state: &StateRef, trigger: &Trigger) -> StateSet {
        let direct = self.direct_targets(state, trigger);
        if direct.is_empty() {
            return direct;
        }
        self.epsilon_closure(&direct)
    }

    /// Insert a new entry. Fails if the key already exists.
    pub fn add_transition(
        &mut self,
        key: TransitionKey,
        targets: StateSet,
    ) -> Result<(), TableError> {
        let key = self.intern_key(key);
        if self.transitions.contains_key(&key) {
            return Err(TableError::duplicate(&key));
        }
        let targets = self.intern_set(targets, &key.state);
        self.transitions.insert(key, targets);
        Ok(())
    }

    /// Replace an existing entry. Fails if the key is absent.
    pub fn update_transition(
        &mut self,
        key: TransitionKey,
        targets: StateSet,
    ) -> Result<(), TableError> {
        let source = match self.transitions.get_key_value(&key) {
            Some((stored, _)) => Arc::clone(&stored.state),
            None => return Err(TableError::missing(&key)),
        };
        let targets = self.intern_set(targets, &source);
        if let Some(entry) = self.transitions.get_mut(&key) {
            *entry = targets;
        }
        Ok(())
    }

    /// Remove an entry, returning its targets if it existed.
    pub fn remove_transition(&mut self, key: &TransitionKey) -> Option<StateSet> {
        self.transitions.remove(key)
    }

    pub fn source_states(&self) -> StateSet {
        self.transitions
            .keys()
            .map(|key| Arc::clone(&key.state))
            .collect()
    }

    pub fn target_states(&self) -> StateSet {
        self.transitions.values().flatten().cloned().collect()
    }

    pub fn triggers(&self) -> HashSet<Trigger> {
        self.transitions
            .keys()
            .map(|key| key.trigger.clone())
            .collect()
    }

    // Reuse the pinned or stored instance for a name, if any.
    fn intern(&self, state: StateRef) -> StateRef {
        self.pinned
            .iter()
            .chain(
                self.transitions
                    .iter()
                    .flat_map(|(key, targets)| std::iter::once(&key.state).chain(targets.iter())),
            )
            .find(|known| **known == state)
            .cloned()
            .unwrap_or(state)
    }

    fn intern_key(&self, key: TransitionKey) -> TransitionKey {
        TransitionKey {
            state: self.intern(key.state),
            trigger: key.trigger,
        }
    }

    // `source` is not in the table yet when a new key is being added.
    fn intern_set(&self, targets: StateSet, source: &StateRef) -> StateSet {
        targets
            .into_iter()
            .map(|state| {
                if state == *source {
                    Arc::clone(source)
                } else {
                    self.intern(state)
                }
            })
            .collect()
    }
}
